//! The rules for tokens in SVG and MathML content.

use canopy_dom::Namespace;

use super::is_whitespace;
use crate::error::ErrorKind;
use crate::parser::core::{Flow, TreeBuilder};
use crate::parser::foreign_content::{
    is_breakout_token, is_html_integration_point, is_mathml_text_integration_point,
};
use crate::tokenizer::Token;

impl TreeBuilder {
    /// [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
    pub(crate) fn in_foreign_content(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            Token::Character { data: '\0' } => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.insert_character('\u{FFFD}');
                Flow::Done
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the token's character."
            Token::Character { data } if is_whitespace(*data) => {
                self.insert_character(*data);
                Flow::Done
            }

            // "Any other character token"
            // "Insert the token's character."
            // "Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.insert_character(*data);
                self.ctx.frameset_ok = false;
                Flow::Done
            }

            // "A comment token"
            Token::Comment { data } => {
                self.insert_comment(data);
                Flow::Done
            }

            // "A DOCTYPE token"
            Token::Doctype { .. } => {
                self.parse_error(ErrorKind::UnexpectedDoctype);
                Flow::Done
            }

            _ if is_breakout_token(token) => self.break_out_of_foreign_content(token),

            // "Any other start tag"
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                // "If the adjusted current node is an element in the MathML
                //  namespace, adjust MathML attributes for the token."
                // "If the adjusted current node is an element in the SVG
                //  namespace, and the token's tag name is one of the ones in
                //  the first column of the following table, change the tag
                //  name to the name given in the corresponding cell in the
                //  second column."
                // "If the adjusted current node is an element in the SVG
                //  namespace, adjust SVG attributes for the token."
                // "Insert a foreign element for the token, with adjusted
                //  current node's namespace and false."
                let namespace = self
                    .adjusted_current_node()
                    .and_then(|node| self.tree.as_element(node))
                    .map_or(Namespace::Html, |element| element.namespace);
                let _ = self.insert_foreign_element(name, attributes, namespace);
                // "If the token has its self-closing flag set, then run the
                //  appropriate steps from the following list:"
                //   "If the token's tag name is "script", and the new current
                //    node is in the SVG namespace: Acknowledge the token's
                //    self-closing flag, and then act as described in the steps
                //    for a "script" end tag below."
                //   "Otherwise: Pop the current node off the stack of open
                //    elements and acknowledge the token's self-closing flag."
                // Scripts are never run, so both reduce to popping.
                if *self_closing {
                    let _ = self.stack.pop();
                }
                Flow::Done
            }

            // "An end tag whose tag name is "script", if the current node is an
            //  SVG script element"
            // "Pop the current script element off the stack of open elements."
            Token::EndTag { name }
                if name == "script"
                    && self
                        .current_node()
                        .and_then(|node| self.tree.as_element(node))
                        .is_some_and(|e| e.is_one_of(Namespace::Svg, &["script"])) =>
            {
                let _ = self.stack.pop();
                Flow::Done
            }

            // "Any other end tag"
            Token::EndTag { name } => self.foreign_end_tag(token, name),

            // End of file always takes the insertion mode rules.
            Token::EndOfFile => self.process_using(self.ctx.insertion_mode, token),
        }
    }

    /// The breakout entry: "Parse error."
    /// "While the current node is not a MathML text integration point, an
    /// HTML integration point, or an element in the HTML namespace, pop
    /// elements from the stack of open elements."
    /// "Reprocess the token according to the rules given in the section
    /// corresponding to the current insertion mode in HTML content."
    fn break_out_of_foreign_content(&mut self, token: &Token) -> Flow {
        self.parse_error(match token {
            Token::EndTag { .. } => ErrorKind::UnexpectedEndTag,
            _ => ErrorKind::UnexpectedStartTag,
        });
        while let Some(node) = self.current_node() {
            let Some(element) = self.tree.as_element(node) else {
                break;
            };
            if element.namespace == Namespace::Html
                || is_mathml_text_integration_point(element)
                || is_html_integration_point(element)
            {
                break;
            }
            let _ = self.stack.pop();
        }
        self.process_using(self.ctx.insertion_mode, token)
    }

    /// "Any other end tag" in foreign content.
    fn foreign_end_tag(&mut self, token: &Token, name: &str) -> Flow {
        let Some(mut index) = self.stack.len().checked_sub(1) else {
            return Flow::Done;
        };

        // STEP 1: "Initialize node to be the current node (the bottommost node
        //          of the stack)."
        // STEP 2: "If node's tag name, converted to ASCII lowercase, is not the
        //          same as the tag name of the token, then this is a parse
        //          error."
        if !self.tag_name_matches(index, name) {
            self.parse_error(ErrorKind::EndTagNotCurrentNode);
        }

        loop {
            // STEP 3: "Loop: If node is the topmost element in the stack of
            //          open elements, then return. (fragment case)"
            if index == 0 {
                return Flow::Done;
            }
            // STEP 4: "If node's tag name, converted to ASCII lowercase, is the
            //          same as the tag name of the token, pop elements from the
            //          stack of open elements until node has been popped from
            //          the stack, and then return."
            if self.tag_name_matches(index, name) {
                self.stack.truncate(index);
                return Flow::Done;
            }
            // STEP 5: "Set node to the previous entry in the stack of open
            //          elements."
            index -= 1;
            // STEP 6: "If node is not an element in the HTML namespace, return
            //          to the step labeled loop."
            let is_html = self
                .stack
                .get(index)
                .and_then(|node| self.tree.as_element(node))
                .is_some_and(|element| element.namespace == Namespace::Html);
            if is_html {
                // STEP 7: "Otherwise, process the token according to the rules
                //          given in the section corresponding to the current
                //          insertion mode in HTML content."
                return self.process_using(self.ctx.insertion_mode, token);
            }
        }
    }

    fn tag_name_matches(&self, index: usize, name: &str) -> bool {
        self.stack
            .get(index)
            .and_then(|node| self.tree.as_element(node))
            .is_some_and(|element| element.tag_name.eq_ignore_ascii_case(name))
    }
}
