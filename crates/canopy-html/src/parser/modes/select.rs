//! `select` elements: "in select" and "in select in table".

use crate::error::ErrorKind;
use crate::parser::core::{Flow, TreeBuilder};
use crate::parser::stack::ScopeKind;
use crate::tokenizer::Token;

const TABLE_PARTS: &[&str] = &["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"];

impl TreeBuilder {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(crate) fn in_select_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                Flow::Done
            }

            // "Any other character token"
            // "Insert the token's character."
            Token::Character { data } => {
                self.insert_character(*data);
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

            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "html""
                "html" => self.in_body_mode(token),

                // "A start tag whose tag name is "option""
                // "If the current node is an option element, pop that node
                //  from the stack of open elements."
                // "Insert an HTML element for the token."
                "option" => {
                    self.pop_if_current("option");
                    let _ = self.insert_html_element(name, attributes);
                    Flow::Done
                }

                // "A start tag whose tag name is "optgroup""
                // "If the current node is an option element, pop that node
                //  from the stack of open elements."
                // "If the current node is an optgroup element, pop that node
                //  from the stack of open elements."
                // "Insert an HTML element for the token."
                "optgroup" => {
                    self.pop_if_current("option");
                    self.pop_if_current("optgroup");
                    let _ = self.insert_html_element(name, attributes);
                    Flow::Done
                }

                // "A start tag whose tag name is "hr""
                // "...Insert an HTML element for the token. Immediately pop the
                //  current node off the stack of open elements."
                "hr" => {
                    self.pop_if_current("option");
                    self.pop_if_current("optgroup");
                    let _ = self.insert_html_element(name, attributes);
                    let _ = self.stack.pop();
                    Flow::Done
                }

                // "A start tag whose tag name is "select""
                // "Parse error."
                // "If the stack of open elements does not have a select element
                //  in select scope, ignore the token. (fragment case)"
                // "Otherwise: Pop elements from the stack of open elements
                //  until a select element has been popped from the stack.
                //  Reset the insertion mode appropriately."
                "select" => {
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    let _ = self.close_select();
                    Flow::Done
                }

                // "A start tag whose tag name is one of: "input", "keygen",
                //  "textarea""
                // "Parse error."
                // "If the stack of open elements does not have a select element
                //  in select scope, ignore the token. (fragment case)"
                // "Otherwise: ... Reprocess the token."
                "input" | "keygen" | "textarea" => {
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    if self.close_select() {
                        Flow::Reprocess
                    } else {
                        Flow::Done
                    }
                }

                // "A start tag whose tag name is one of: "script", "template""
                // "Process the token using the rules for the "in head"
                //  insertion mode."
                "script" | "template" => self.in_head_mode(token),

                // "Anything else"
                // "Parse error. Ignore the token."
                _ => {
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    Flow::Done
                }
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "optgroup""
                "optgroup" => {
                    // "First, if the current node is an option element, and the
                    //  node immediately before it in the stack of open elements
                    //  is an optgroup element, then pop the current node from
                    //  the stack of open elements."
                    let before_current = self
                        .stack
                        .len()
                        .checked_sub(2)
                        .and_then(|index| self.stack.get(index));
                    if self.current_is("option")
                        && before_current.is_some_and(|node| self.node_is(node, "optgroup"))
                    {
                        let _ = self.stack.pop();
                    }
                    // "If the current node is an optgroup element, then pop
                    //  that node from the stack of open elements. Otherwise,
                    //  this is a parse error; ignore the token."
                    if self.current_is("optgroup") {
                        let _ = self.stack.pop();
                    } else {
                        self.parse_error(ErrorKind::UnexpectedEndTag);
                    }
                    Flow::Done
                }

                // "An end tag whose tag name is "option""
                // "If the current node is an option element, then pop that node
                //  from the stack of open elements. Otherwise, this is a parse
                //  error; ignore the token."
                "option" => {
                    if self.current_is("option") {
                        let _ = self.stack.pop();
                    } else {
                        self.parse_error(ErrorKind::UnexpectedEndTag);
                    }
                    Flow::Done
                }

                // "An end tag whose tag name is "select""
                "select" => {
                    let _ = self.close_select();
                    Flow::Done
                }

                // "An end tag whose tag name is "template""
                "template" => self.in_head_mode(token),

                _ => {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    Flow::Done
                }
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => self.in_body_mode(token),
        }
    }

    fn pop_if_current(&mut self, tag: &str) {
        if self.current_is(tag) {
            let _ = self.stack.pop();
        }
    }

    /// "If the stack of open elements does not have a select element in select
    /// scope, this is a parse error; ignore the token. (fragment case)"
    /// "Otherwise: Pop elements from the stack of open elements until a select
    /// element has been popped from the stack. Reset the insertion mode
    /// appropriately."
    fn close_select(&mut self) -> bool {
        if !self.in_scope("select", ScopeKind::Select) {
            self.parse_error(ErrorKind::UnexpectedEndTag);
            return false;
        }
        self.pop_until("select");
        self.reset_insertion_mode_appropriately();
        true
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(crate) fn in_select_in_table_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            //  "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error."
            // "Pop elements from the stack of open elements until a select
            //  element has been popped from the stack."
            // "Reset the insertion mode appropriately."
            // "Reprocess the token."
            Token::StartTag { name, .. } if TABLE_PARTS.contains(&name.as_str()) => {
                self.parse_error(ErrorKind::UnexpectedStartTag);
                self.pop_until("select");
                self.reset_insertion_mode_appropriately();
                Flow::Reprocess
            }

            // "An end tag whose tag name is one of: "caption", "table",
            //  "tbody", "tfoot", "thead", "tr", "td", "th""
            Token::EndTag { name } if TABLE_PARTS.contains(&name.as_str()) => {
                // "Parse error."
                self.parse_error(ErrorKind::UnexpectedEndTag);
                // "If the stack of open elements does not have an element in
                //  table scope that is an HTML element with the same tag name
                //  as that of the token, then ignore the token."
                if !self.in_scope(name, ScopeKind::Table) {
                    return Flow::Done;
                }
                // "Otherwise: Pop elements from the stack of open elements
                //  until a select element has been popped from the stack."
                // "Reset the insertion mode appropriately."
                // "Reprocess the token."
                self.pop_until("select");
                self.reset_insertion_mode_appropriately();
                Flow::Reprocess
            }

            // "Anything else"
            // "Process the token using the rules for the "in select" insertion mode."
            _ => self.in_select_mode(token),
        }
    }
}
