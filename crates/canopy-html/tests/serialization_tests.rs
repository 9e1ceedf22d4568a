//! Serializing parsed trees and parsing the result again.

use canopy_dom::{Namespace, NodeId, dump, serialize, serialize_children};
use canopy_html::{parse_document, parse_fragment};
use pretty_assertions::assert_eq;

const DOCUMENTS: &[&str] = &[
    "<!DOCTYPE html><html><head><title>T</title></head><body><p>Hello</p></body></html>",
    "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><style>p > b { color: red }</style></head>\
     <body><ul><li>one</li><li>two &amp; three</li></ul></body></html>",
    "<!DOCTYPE html><table><caption>c</caption><tbody><tr><td>1</td><td>2</td></tr></tbody></table>",
    "<!DOCTYPE html><p>a <b>bold <i>both</i></b> <a href=\"x?a=1&amp;b=2\">link</a></p>",
    "<!DOCTYPE html><pre>\n\nindented</pre><textarea>\n&lt;raw&gt;</textarea>",
    "<!DOCTYPE html><svg viewBox=\"0 0 10 10\"><circle r=\"5\"></circle><foreignObject><p>x</p></foreignObject></svg>",
    "<!DOCTYPE html><template><tr><td>cell</td></tr></template><!-- trailing comment -->",
    "<!DOCTYPE html><script>if (a < b && c > d) {}</script><div title='\"quoted\"'>\u{00A0}</div>",
];

fn roundtrip(html: &str) -> (String, String) {
    let first = parse_document(html).expect("parses");
    let markup = serialize(&first.tree, NodeId::ROOT);
    let second = parse_document(&markup).expect("parses");
    (
        dump(&first.tree, NodeId::ROOT),
        dump(&second.tree, NodeId::ROOT),
    )
}

#[test]
fn test_roundtrip_is_structurally_stable() {
    for html in DOCUMENTS {
        let (first, second) = roundtrip(html);
        assert_eq!(first, second, "round trip of {html:?}");
    }
}

#[test]
fn test_serialization_is_a_fixed_point() {
    for html in DOCUMENTS {
        let once = serialize(&parse_document(html).expect("parses").tree, NodeId::ROOT);
        let twice = serialize(&parse_document(&once).expect("parses").tree, NodeId::ROOT);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_serialize_parsed_document() {
    let doc = parse_document("<!DOCTYPE html><p class=a>x &lt; y<br>z").expect("parses");
    assert_eq!(
        serialize(&doc.tree, NodeId::ROOT),
        "<!DOCTYPE html><html><head></head><body><p class=\"a\">x &lt; y<br>z</p></body></html>"
    );
}

#[test]
fn test_fragment_roundtrip() {
    let fragment = parse_fragment("<td>a<b>b</b></td><td>c", "tr", Namespace::Html)
        .expect("parses");
    let markup = serialize_children(&fragment.tree, fragment.root);
    assert_eq!(markup, "<td>a<b>b</b></td><td>c</td>");

    let again = parse_fragment(&markup, "tr", Namespace::Html).expect("parses");
    assert_eq!(
        dump(&again.tree, again.root),
        dump(&fragment.tree, fragment.root)
    );
}
