//! The "in body" and "text" insertion modes.

use canopy_dom::{Namespace, NodeId, QuirksMode};

use super::is_whitespace;
use crate::error::ErrorKind;
use crate::parser::context::InsertionMode;
use crate::parser::core::{FORMATTING_ELEMENTS, Flow, TreeBuilder, is_special};
use crate::parser::stack::ScopeKind;
use crate::tokenizer::{Attribute, Token, TokenizerState};

/// Start tags that close an open `p` and are then inserted plainly.
const BLOCK_START_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "main", "menu", "nav",
    "ol", "p", "search", "section", "summary", "ul",
];

/// End tags closed with the generic "in scope, generate, pop" steps.
const BLOCK_END_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing",
    "main", "menu", "nav", "ol", "pre", "search", "section", "summary", "ul",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

impl TreeBuilder {
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(crate) fn in_body_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                Flow::Done
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            Token::Character { data } if is_whitespace(*data) => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                Flow::Done
            }

            // "Any other character token"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the token's character."
            // "Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                self.ctx.frameset_ok = false;
                Flow::Done
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data);
                Flow::Done
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error(ErrorKind::UnexpectedDoctype);
                Flow::Done
            }

            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => self.in_body_start_tag(token, name, attributes, *self_closing),

            Token::EndTag { name } => self.in_body_end_tag(token, name),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                //  process the token using the rules for the "in template"
                //  insertion mode."
                if !self.ctx.template_modes.is_empty() {
                    return self.in_template_mode(token);
                }
                // "Otherwise, follow these steps:"
                // STEP 1: "If there is a node in the stack of open elements
                //          that is not either a dd element, ... the body
                //          element, or the html element, then this is a parse
                //          error."
                if self.has_unclosed_required_elements() {
                    self.parse_error(ErrorKind::EofWithUnclosedElements);
                }
                // STEP 2: "Stop parsing."
                self.stop_parsing();
                Flow::Done
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn in_body_start_tag(
        &mut self,
        token: &Token,
        name: &str,
        attributes: &[Attribute],
        self_closing: bool,
    ) -> Flow {
        match name {
            // "A start tag whose tag name is "html""
            "html" => {
                // "Parse error."
                self.parse_error(ErrorKind::UnexpectedStartTag);
                // "If there is a template element on the stack of open
                //  elements, then ignore the token."
                // "Otherwise, for each attribute on the token, check to see if
                //  the attribute is already present on the top element of the
                //  stack of open elements. If it is not, add the attribute and
                //  its corresponding value to that element."
                if !self.stack.contains_tag(&self.tree, "template")
                    && let Some(html) = self.stack.first()
                {
                    self.merge_attributes(html, attributes);
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            //  "bgsound", "link", "meta", "noframes", "script", "style",
            //  "template", "title""
            // "Process the token using the rules for the "in head" insertion mode."
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
            | "template" | "title" => return self.in_head_mode(token),

            // "A start tag whose tag name is "body""
            "body" => {
                // "Parse error."
                self.parse_error(ErrorKind::UnexpectedStartTag);
                // "If the second element on the stack of open elements is not a
                //  body element, if the stack of open elements has only one
                //  node on it, or if there is a template element on the stack
                //  of open elements, then ignore the token. (fragment case or
                //  there is a template element on the stack)"
                let body = self.stack.get(1).filter(|&node| self.node_is(node, "body"));
                if let Some(body) = body
                    && !self.stack.contains_tag(&self.tree, "template")
                {
                    // "Otherwise, set the frameset-ok flag to "not ok"; then,
                    //  for each attribute on the token, check to see if the
                    //  attribute is already present on the body element (the
                    //  second element) on the stack of open elements, and if
                    //  it is not, add the attribute and its corresponding value
                    //  to that element."
                    self.ctx.frameset_ok = false;
                    self.merge_attributes(body, attributes);
                }
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                // "Parse error."
                self.parse_error(ErrorKind::UnexpectedStartTag);
                // "If the stack of open elements has only one node on it, or if
                //  the second element on the stack of open elements is not a
                //  body element, then ignore the token. (fragment case or
                //  there is a template element on the stack)"
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                let body = self.stack.get(1).filter(|&node| self.node_is(node, "body"));
                if let Some(body) = body
                    && self.ctx.frameset_ok
                {
                    // STEP 1: "Remove the second element on the stack of open
                    //          elements from its parent node, if it has one."
                    self.tree.detach(body);
                    // STEP 2: "Pop all the nodes from the bottom of the stack
                    //          of open elements, from the current node up to,
                    //          but not including, the root html element."
                    self.stack.truncate(1);
                    // STEP 3: "Insert an HTML element for the token."
                    let _ = self.insert_html_element(name, attributes);
                    // STEP 4: "Switch the insertion mode to "in frameset"."
                    self.switch_mode(InsertionMode::InFrameset);
                }
            }

            // "A start tag whose tag name is one of: "address", "article",
            //  "aside", "blockquote", "center", "details", "dialog", "dir",
            //  "div", "dl", "fieldset", "figcaption", "figure", "footer",
            //  "header", "hgroup", "main", "menu", "nav", "ol", "p", "search",
            //  "section", "summary", "ul""
            // "If the stack of open elements has a p element in button scope,
            //  then close a p element."
            // "Insert an HTML element for the token."
            _ if BLOCK_START_TAGS.contains(&name) => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4",
            //  "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                self.close_p_if_in_button_scope();
                // "If the current node is an HTML element whose tag name is one
                //  of "h1", "h2", "h3", "h4", "h5", or "h6", then this is a
                //  parse error; pop the current node off the stack of open
                //  elements."
                if self.current_is_one_of(HEADINGS) {
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    let _ = self.stack.pop();
                }
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            // "If the stack of open elements has a p element in button scope,
            //  then close a p element."
            // "Insert an HTML element for the token."
            // "If the next token is a U+000A LINE FEED (LF) character token,
            //  then ignore that token and move on to the next one."
            // "Set the frameset-ok flag to "not ok"."
            "pre" | "listing" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
                self.ctx.skip_next_newline = true;
                self.ctx.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            "form" => {
                let in_template = self.stack.contains_tag(&self.tree, "template");
                // "If the form element pointer is not null, and there is no
                //  template element on the stack of open elements, then this is
                //  a parse error; ignore the token."
                if self.ctx.form_element.is_some() && !in_template {
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    return Flow::Done;
                }
                // "Otherwise: If the stack of open elements has a p element in
                //  button scope, then close a p element. Insert an HTML element
                //  for the token, and, if there is no template element on the
                //  stack of open elements, set the form element pointer to point
                //  to the element created."
                self.close_p_if_in_button_scope();
                let form = self.insert_html_element(name, attributes);
                if !in_template {
                    self.ctx.form_element = Some(form);
                }
            }

            // "A start tag whose tag name is "li""
            "li" => self.start_list_item(name, attributes, &["li"]),

            // "A start tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => self.start_list_item(name, attributes, &["dd", "dt"]),

            // "A start tag whose tag name is "plaintext""
            // "If the stack of open elements has a p element in button scope,
            //  then close a p element."
            // "Insert an HTML element for the token."
            // "Switch the tokenizer to the PLAINTEXT state."
            "plaintext" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
                self.switch_tokenizer(TokenizerState::PLAINTEXT);
            }

            // "A start tag whose tag name is "button""
            "button" => {
                // STEP 1: "If the stack of open elements has a button element in
                //          scope, then run these substeps:"
                if self.in_scope("button", ScopeKind::Default) {
                    // "Parse error."
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    // "Generate implied end tags."
                    self.generate_implied_end_tags(None);
                    // "Pop elements from the stack of open elements until a
                    //  button element has been popped from the stack."
                    self.pop_until("button");
                }
                // STEP 2: "Reconstruct the active formatting elements, if any."
                self.reconstruct_active_formatting_elements();
                // STEP 3: "Insert an HTML element for the token."
                let _ = self.insert_html_element(name, attributes);
                // STEP 4: "Set the frameset-ok flag to "not ok"."
                self.ctx.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            "a" => {
                // "If the list of active formatting elements contains an a
                //  element between the end of the list and the last marker on
                //  the list (or the start of the list if there is no marker on
                //  the list), then this is a parse error; run the adoption
                //  agency algorithm for the token, then remove that element
                //  from the list of active formatting elements and the stack of
                //  open elements if the adoption agency algorithm didn't
                //  already remove it (it might not have if the element is not
                //  in table scope)."
                if let Some(existing) = self.formatting.last_named_after_marker("a") {
                    self.parse_error(ErrorKind::MisnestedFormattingElement);
                    self.run_adoption_agency("a");
                    let _ = self.formatting.remove(existing);
                    let _ = self.stack.remove_element(existing);
                }
                // "Reconstruct the active formatting elements, if any."
                // "Insert an HTML element for the token. Push onto the list of
                //  active formatting elements that element."
                self.insert_formatting_element(token, name, attributes);
            }

            // "A start tag whose tag name is "nobr""
            "nobr" => {
                // "Reconstruct the active formatting elements, if any."
                self.reconstruct_active_formatting_elements();
                // "If the stack of open elements has a nobr element in scope,
                //  then this is a parse error; run the adoption agency
                //  algorithm for the token, then once again reconstruct the
                //  active formatting elements, if any."
                if self.in_scope("nobr", ScopeKind::Default) {
                    self.parse_error(ErrorKind::MisnestedFormattingElement);
                    self.run_adoption_agency("nobr");
                }
                self.insert_formatting_element(token, name, attributes);
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            //  "font", "i", "s", "small", "strike", "strong", "tt", "u""
            _ if FORMATTING_ELEMENTS.contains(&name) => {
                self.insert_formatting_element(token, name, attributes);
            }

            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Insert a marker at the end of the list of active formatting elements."
            // "Set the frameset-ok flag to "not ok"."
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
                self.formatting.insert_marker();
                self.ctx.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            // "If the Document is not set to quirks mode, and the stack of open
            //  elements has a p element in button scope, then close a p
            //  element."
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in table"."
            "table" => {
                if self.tree.quirks_mode() != QuirksMode::Quirks {
                    self.close_p_if_in_button_scope();
                }
                let _ = self.insert_html_element(name, attributes);
                self.ctx.frameset_ok = false;
                self.switch_mode(InsertionMode::InTable);
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            //  "img", "keygen", "wbr""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Immediately pop the
            //  current node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            // "Set the frameset-ok flag to "not ok"."
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
                let _ = self.stack.pop();
                self.ctx.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            "input" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
                let _ = self.stack.pop();
                // "If the token does not have an attribute with the name
                //  "type", or if it does, but that attribute's value is not an
                //  ASCII case-insensitive match for the string "hidden", then:
                //  set the frameset-ok flag to "not ok"."
                let hidden = token
                    .attribute("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("hidden"));
                if !hidden {
                    self.ctx.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            // "Insert an HTML element for the token. Immediately pop the
            //  current node off the stack of open elements."
            "param" | "source" | "track" => {
                let _ = self.insert_html_element(name, attributes);
                let _ = self.stack.pop();
            }

            // "A start tag whose tag name is "hr""
            "hr" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(name, attributes);
                let _ = self.stack.pop();
                self.ctx.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess
            //  it. (Don't ask.)"
            "image" => {
                self.parse_error(ErrorKind::UnexpectedStartTag);
                let img = Token::StartTag {
                    name: "img".to_string(),
                    self_closing,
                    attributes: attributes.to_vec(),
                };
                return self.in_body_mode(&img);
            }

            // "A start tag whose tag name is "textarea""
            "textarea" => {
                // STEP 1: "Insert an HTML element for the token."
                let _ = self.insert_html_element(name, attributes);
                // STEP 2: "If the next token is a U+000A LINE FEED (LF)
                //          character token, then ignore that token and move on
                //          to the next one."
                self.ctx.skip_next_newline = true;
                // STEP 3: "Switch the tokenizer to the RCDATA state."
                self.switch_tokenizer(TokenizerState::RCDATA);
                // STEP 4: "Let the original insertion mode be the current
                //          insertion mode."
                self.ctx.original_insertion_mode = Some(self.ctx.insertion_mode);
                // STEP 5: "Set the frameset-ok flag to "not ok"."
                self.ctx.frameset_ok = false;
                // STEP 6: "Switch the insertion mode to "text"."
                self.switch_mode(InsertionMode::Text);
            }

            // "A start tag whose tag name is "xmp""
            "xmp" => {
                self.close_p_if_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.ctx.frameset_ok = false;
                self.parse_text_element(name, attributes, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "iframe""
            "iframe" => {
                self.ctx.frameset_ok = false;
                self.parse_text_element(name, attributes, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag
            //  is enabled"
            // "Follow the generic raw text element parsing algorithm."
            "noembed" => self.parse_text_element(name, attributes, TokenizerState::RAWTEXT),
            "noscript" if self.ctx.scripting => {
                self.parse_text_element(name, attributes, TokenizerState::RAWTEXT);
            }

            // "A start tag whose tag name is "select""
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
                self.ctx.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption",
                //  "in table body", "in row", or "in cell", then switch the
                //  insertion mode to "in select in table". Otherwise, switch
                //  the insertion mode to "in select"."
                let mode = match self.ctx.insertion_mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
                self.switch_mode(mode);
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            // "If the current node is an option element, then pop the current
            //  node off the stack of open elements."
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            "optgroup" | "option" => {
                if self.current_is("option") {
                    let _ = self.stack.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            // "If the stack of open elements has a ruby element in scope, then
            //  generate implied end tags. If the current node is not now a ruby
            //  element, this is a parse error."
            "rb" | "rtc" => {
                if self.in_scope("ruby", ScopeKind::Default) {
                    self.generate_implied_end_tags(None);
                    if !self.current_is("ruby") {
                        self.parse_error(ErrorKind::UnexpectedStartTag);
                    }
                }
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            // "If the stack of open elements has a ruby element in scope, then
            //  generate implied end tags, except for rtc elements. If the
            //  current node is not now a rtc element or a ruby element, this is
            //  a parse error."
            "rp" | "rt" => {
                if self.in_scope("ruby", ScopeKind::Default) {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.current_is_one_of(&["rtc", "ruby"]) {
                        self.parse_error(ErrorKind::UnexpectedStartTag);
                    }
                }
                let _ = self.insert_html_element(name, attributes);
            }

            // "A start tag whose tag name is "math""
            // "A start tag whose tag name is "svg""
            // "Reconstruct the active formatting elements, if any."
            // "Adjust MathML attributes for the token." / "Adjust SVG
            //  attributes for the token."
            // "Adjust foreign attributes for the token."
            // "Insert a foreign element for the token, with MathML namespace."
            // "If the token has its self-closing flag set, pop the current node
            //  off the stack of open elements and acknowledge the token's
            //  self-closing flag."
            "math" | "svg" => {
                let namespace = if name == "math" {
                    Namespace::MathMl
                } else {
                    Namespace::Svg
                };
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_foreign_element(name, attributes, namespace);
                if self_closing {
                    let _ = self.stack.pop();
                }
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            //  "thead", "tr""
            // "Parse error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => self.parse_error(ErrorKind::UnexpectedStartTag),

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(name, attributes);
            }
        }
        Flow::Done
    }

    fn in_body_end_tag(&mut self, token: &Token, name: &str) -> Flow {
        match name {
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            "template" => return self.in_head_mode(token),

            // "An end tag whose tag name is "body""
            // "An end tag whose tag name is "html""
            "body" | "html" => {
                // "If the stack of open elements does not have a body element
                //  in scope, this is a parse error; ignore the token."
                if !self.in_scope("body", ScopeKind::Default) {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    return Flow::Done;
                }
                // "Otherwise, if there is a node in the stack of open elements
                //  that is not either a dd element, ... or the html element,
                //  then this is a parse error."
                if self.has_unclosed_required_elements() {
                    self.parse_error(ErrorKind::EndTagNotCurrentNode);
                }
                // "Switch the insertion mode to "after body"."
                self.switch_mode(InsertionMode::AfterBody);
                // For </html>: "Reprocess the token."
                if name == "html" {
                    return Flow::Reprocess;
                }
            }

            // "An end tag whose tag name is one of: "address", "article", ...
            //  "ul""
            _ if BLOCK_END_TAGS.contains(&name) => {
                // "If the stack of open elements does not have an element in
                //  scope that is an HTML element with the same tag name as that
                //  of the token, then this is a parse error; ignore the token."
                if !self.in_scope(name, ScopeKind::Default) {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    return Flow::Done;
                }
                self.close_element(name, None);
            }

            // "An end tag whose tag name is "form""
            "form" => self.end_form(),

            // "An end tag whose tag name is "p""
            "p" => {
                // "If the stack of open elements does not have a p element in
                //  button scope, then this is a parse error; insert an HTML
                //  element for a "p" start tag token with no attributes."
                if !self.in_scope("p", ScopeKind::Button) {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    let _ = self.insert_html_element("p", &[]);
                }
                // "Close a p element."
                self.close_p_element();
            }

            // "An end tag whose tag name is "li""
            "li" => {
                // "If the stack of open elements does not have an li element in
                //  list item scope, then this is a parse error; ignore the
                //  token."
                if !self.in_scope("li", ScopeKind::ListItem) {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    return Flow::Done;
                }
                self.close_element("li", Some("li"));
            }

            // "An end tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                if !self.in_scope(name, ScopeKind::Default) {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    return Flow::Done;
                }
                self.close_element(name, Some(name));
            }

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4",
            //  "h5", "h6""
            _ if HEADINGS.contains(&name) => {
                // "If the stack of open elements does not have an element in
                //  scope that is an HTML element and whose tag name is one of
                //  "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                //  error; ignore the token."
                if !self
                    .stack
                    .has_any_in_scope(&self.tree, HEADINGS, ScopeKind::Default)
                {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    return Flow::Done;
                }
                // "Generate implied end tags."
                self.generate_implied_end_tags(None);
                // "If the current node is not an HTML element with the same tag
                //  name as that of the token, then this is a parse error."
                if !self.current_is(name) {
                    self.parse_error(ErrorKind::EndTagNotCurrentNode);
                }
                // "Pop elements from the stack of open elements until an HTML
                //  element whose tag name is one of "h1", "h2", "h3", "h4",
                //  "h5", or "h6" has been popped from the stack."
                self.stack.pop_until_one_of(&self.tree, HEADINGS);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            //  "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            //  "tt", "u""
            // "Run the adoption agency algorithm for the token."
            _ if FORMATTING_ELEMENTS.contains(&name) => self.run_adoption_agency(name),

            // "An end tag token whose tag name is one of: "applet", "marquee",
            //  "object""
            "applet" | "marquee" | "object" => {
                if !self.in_scope(name, ScopeKind::Default) {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    return Flow::Done;
                }
                self.close_element(name, None);
                // "Clear the list of active formatting elements up to the last
                //  marker."
                self.formatting.clear_to_last_marker();
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            //  described in the next entry; i.e. act as if this was a "br"
            //  start tag token with no attributes, rather than the end tag
            //  token that it actually is."
            "br" => {
                self.parse_error(ErrorKind::UnexpectedEndTag);
                return self.in_body_mode(&Token::start_tag("br", Vec::new()));
            }

            // "Any other end tag"
            _ => self.any_other_end_tag(name),
        }
        Flow::Done
    }

    /// "Generate implied end tags" (except for `excluding`). "If the current
    /// node is not an HTML element with the same tag name as that of the
    /// token, then this is a parse error." "Pop elements from the stack of
    /// open elements until an HTML element with the same tag name as the token
    /// has been popped from the stack."
    fn close_element(&mut self, name: &str, excluding: Option<&str>) {
        self.generate_implied_end_tags(excluding);
        if !self.current_is(name) {
            self.parse_error(ErrorKind::EndTagNotCurrentNode);
        }
        self.pop_until(name);
    }

    /// "An end tag whose tag name is "form""
    fn end_form(&mut self) {
        // "If there is no template element on the stack of open elements,
        //  then run these substeps:"
        if !self.stack.contains_tag(&self.tree, "template") {
            // STEP 1: "Let node be the element that the form element pointer
            //          is set to, or null if it is not set to an element."
            // STEP 2: "Set the form element pointer to null."
            let node = self.ctx.form_element.take();
            // STEP 3: "If node is null or the stack of open elements does not
            //          have node in scope, then this is a parse error; return
            //          and ignore the token."
            let Some(node) = node.filter(|&node| {
                self.stack
                    .has_node_in_scope(&self.tree, node, ScopeKind::Default)
            }) else {
                self.parse_error(ErrorKind::UnexpectedEndTag);
                return;
            };
            // STEP 4: "Generate implied end tags."
            self.generate_implied_end_tags(None);
            // STEP 5: "If the current node is not node, then this is a parse
            //          error."
            if self.current_node() != Some(node) {
                self.parse_error(ErrorKind::EndTagNotCurrentNode);
            }
            // STEP 6: "Remove node from the stack of open elements."
            let _ = self.stack.remove_element(node);
            return;
        }

        // "If there is a template element on the stack of open elements, then
        //  run these substeps instead:"
        // STEP 1: "If the stack of open elements does not have a form element
        //          in scope, then this is a parse error; return and ignore the
        //          token."
        if !self.in_scope("form", ScopeKind::Default) {
            self.parse_error(ErrorKind::UnexpectedEndTag);
            return;
        }
        // STEP 2-4: "Generate implied end tags." ... "Pop elements from the
        //            stack of open elements until a form element has been
        //            popped from the stack."
        self.close_element("form", None);
    }

    /// "A start tag whose tag name is "li"" and "A start tag whose tag name is
    /// one of: "dd", "dt"". `closes` lists the names an earlier open item may
    /// have.
    fn start_list_item(&mut self, name: &str, attributes: &[Attribute], closes: &[&str]) {
        // STEP 1: "Set the frameset-ok flag to "not ok"."
        self.ctx.frameset_ok = false;

        // STEP 2: "Initialize node to be the current node (the bottommost node
        //          of the stack)."
        for index in (0..self.stack.len()).rev() {
            let Some(node) = self.stack.get(index) else {
                break;
            };
            let Some(element) = self.tree.as_element(node) else {
                continue;
            };
            // STEP 3: "Loop: If node is an li element (a dd or dt element),
            //          then run these substeps:"
            if element.is_one_of(Namespace::Html, closes) {
                let item = element.tag_name.clone();
                // "Generate implied end tags, except for li elements."
                self.generate_implied_end_tags(Some(&item));
                // "If the current node is not an li element, then this is a
                //  parse error."
                if !self.current_is(&item) {
                    self.parse_error(ErrorKind::EndTagNotCurrentNode);
                }
                // "Pop elements from the stack of open elements until an li
                //  element has been popped from the stack."
                self.pop_until(&item);
                // "Jump to the step labeled done below."
                break;
            }
            // STEP 4: "If node is in the special category, but is not an
            //          address, div, or p element, then jump to the step
            //          labeled done below."
            if is_special(element) && !element.is_one_of(Namespace::Html, &["address", "div", "p"])
            {
                break;
            }
            // STEP 5: "Otherwise, set node to the previous entry in the stack
            //          of open elements and return to the step labeled loop."
        }

        // STEP 6: "Done: If the stack of open elements has a p element in
        //          button scope, then close a p element."
        self.close_p_if_in_button_scope();
        // STEP 7: "Finally, insert an HTML element for the token."
        let _ = self.insert_html_element(name, attributes);
    }

    /// "Reconstruct the active formatting elements, if any. Insert an HTML
    /// element for the token. Push onto the list of active formatting elements
    /// that element."
    fn insert_formatting_element(&mut self, token: &Token, name: &str, attributes: &[Attribute]) {
        self.reconstruct_active_formatting_elements();
        let element = self.insert_html_element(name, attributes);
        self.formatting.push(element, token.clone());
    }

    /// Add each attribute `node` lacks.
    fn merge_attributes(&mut self, node: NodeId, attributes: &[Attribute]) {
        if let Some(element) = self.tree.as_element_mut(node) {
            for attr in attributes {
                let _ = element
                    .attrs
                    .insert_if_absent(attr.name.clone(), attr.value.clone());
            }
        }
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(crate) fn text_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data } => {
                self.insert_character(*data);
                Flow::Done
            }

            // "An end-of-file token"
            // "Parse error."
            // "If the current node is a script element, then set its already
            //  started to true."
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode and
            //  reprocess the token."
            Token::EndOfFile => {
                self.parse_error(ErrorKind::EofInText);
                let _ = self.stack.pop();
                self.restore_original_mode();
                Flow::Reprocess
            }

            // "An end tag whose tag name is "script""
            // "Any other end tag"
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode."
            //
            // Scripts are never run, so both entries reduce to the same steps.
            Token::EndTag { .. } => {
                let _ = self.stack.pop();
                self.restore_original_mode();
                Flow::Done
            }

            // The tokenizer only produces characters, end tags and end of file
            // in the text states.
            Token::StartTag { .. } | Token::Comment { .. } | Token::Doctype { .. } => Flow::Done,
        }
    }

    fn restore_original_mode(&mut self) {
        let mode = self
            .ctx
            .original_insertion_mode
            .take()
            .unwrap_or(InsertionMode::InBody);
        self.switch_mode(mode);
    }
}
