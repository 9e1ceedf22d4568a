//! The modes after the body, and framesets.

use canopy_dom::NodeId;

use super::is_whitespace;
use crate::error::ErrorKind;
use crate::parser::context::InsertionMode;
use crate::parser::core::{Flow, TreeBuilder};
use crate::tokenizer::Token;

impl TreeBuilder {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(crate) fn after_body_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Character { data } if is_whitespace(*data) => self.in_body_mode(token),

            // "A comment token"
            // "Insert a comment as the last child of the first element in the
            //  stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self.stack.first().unwrap_or(NodeId::ROOT);
                self.append_comment(html, data);
                Flow::Done
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error(ErrorKind::UnexpectedDoctype);
                Flow::Done
            }

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => self.in_body_mode(token),

            // "An end tag whose tag name is "html""
            // "If the parser was created as part of the HTML fragment parsing
            //  algorithm, this is a parse error; ignore the token. (fragment
            //  case)"
            // "Otherwise, switch the insertion mode to "after after body"."
            Token::EndTag { name } if name == "html" => {
                if self.ctx.fragment_context.is_some() {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                } else {
                    self.switch_mode(InsertionMode::AfterAfterBody);
                }
                Flow::Done
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => {
                self.stop_parsing();
                Flow::Done
            }

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and
            //  reprocess the token."
            _ => self.back_to_body(token),
        }
    }

    fn back_to_body(&mut self, token: &Token) -> Flow {
        self.parse_error(unexpected(token));
        self.switch_mode(InsertionMode::InBody);
        Flow::Reprocess
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(crate) fn in_frameset_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            Token::Character { data } if is_whitespace(*data) => {
                self.insert_character(*data);
                Flow::Done
            }

            Token::Comment { data } => {
                self.insert_comment(data);
                Flow::Done
            }

            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                "html" => self.in_body_mode(token),

                // "A start tag whose tag name is "frameset""
                // "Insert an HTML element for the token."
                "frameset" => {
                    let _ = self.insert_html_element(name, attributes);
                    Flow::Done
                }

                // "A start tag whose tag name is "frame""
                // "Insert an HTML element for the token. Immediately pop the
                //  current node off the stack of open elements."
                "frame" => {
                    let _ = self.insert_html_element(name, attributes);
                    let _ = self.stack.pop();
                    Flow::Done
                }

                // "A start tag whose tag name is "noframes""
                // "Process the token using the rules for the "in head"
                //  insertion mode."
                "noframes" => self.in_head_mode(token),

                _ => {
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    Flow::Done
                }
            },

            // "An end tag whose tag name is "frameset""
            Token::EndTag { name } if name == "frameset" => {
                // "If the current node is the root html element, then this is a
                //  parse error; ignore the token. (fragment case)"
                if self.current_is("html") {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    return Flow::Done;
                }
                // "Otherwise, pop the current node from the stack of open
                //  elements."
                let _ = self.stack.pop();
                // "If the parser was not created as part of the HTML fragment
                //  parsing algorithm (fragment case), and the current node is
                //  no longer a frameset element, then switch the insertion mode
                //  to "after frameset"."
                if self.ctx.fragment_context.is_none() && !self.current_is("frameset") {
                    self.switch_mode(InsertionMode::AfterFrameset);
                }
                Flow::Done
            }

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is a
            //  parse error."
            // "Note: The current node can only be the root html element in the
            //  fragment case."
            // "Stop parsing."
            Token::EndOfFile => {
                if !self.current_is("html") {
                    self.parse_error(ErrorKind::EofWithUnclosedElements);
                }
                self.stop_parsing();
                Flow::Done
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => {
                self.parse_error(unexpected(token));
                Flow::Done
            }
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(crate) fn after_frameset_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Character { data } if is_whitespace(*data) => {
                self.insert_character(*data);
                Flow::Done
            }

            Token::Comment { data } => {
                self.insert_comment(data);
                Flow::Done
            }

            Token::StartTag { name, .. } if name == "html" => self.in_body_mode(token),

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after frameset"."
            Token::EndTag { name } if name == "html" => {
                self.switch_mode(InsertionMode::AfterAfterFrameset);
                Flow::Done
            }

            Token::StartTag { name, .. } if name == "noframes" => self.in_head_mode(token),

            Token::EndOfFile => {
                self.stop_parsing();
                Flow::Done
            }

            _ => {
                self.parse_error(unexpected(token));
                Flow::Done
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(crate) fn after_after_body_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.append_comment(NodeId::ROOT, data);
                Flow::Done
            }

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Doctype { .. } => self.in_body_mode(token),
            Token::Character { data } if is_whitespace(*data) => self.in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.in_body_mode(token),

            Token::EndOfFile => {
                self.stop_parsing();
                Flow::Done
            }

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and
            //  reprocess the token."
            _ => self.back_to_body(token),
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(crate) fn after_after_frameset_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::Comment { data } => {
                self.append_comment(NodeId::ROOT, data);
                Flow::Done
            }

            Token::Doctype { .. } => self.in_body_mode(token),
            Token::Character { data } if is_whitespace(*data) => self.in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.in_body_mode(token),

            Token::EndOfFile => {
                self.stop_parsing();
                Flow::Done
            }

            // "A start tag whose tag name is "noframes""
            Token::StartTag { name, .. } if name == "noframes" => self.in_head_mode(token),

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => {
                self.parse_error(unexpected(token));
                Flow::Done
            }
        }
    }
}

/// The error code for a token that has no place in the current mode.
const fn unexpected(token: &Token) -> ErrorKind {
    match token {
        Token::StartTag { .. } => ErrorKind::UnexpectedStartTag,
        Token::EndTag { .. } => ErrorKind::UnexpectedEndTag,
        Token::Doctype { .. } => ErrorKind::UnexpectedDoctype,
        _ => ErrorKind::UnexpectedCharacter,
    }
}
