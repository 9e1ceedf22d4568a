//! The modes before the body: "initial" through "after head".

use canopy_dom::{DoctypeData, Namespace, NodeId, NodeType, QuirksMode};

use super::is_whitespace;
use crate::error::ErrorKind;
use crate::parser::context::InsertionMode;
use crate::parser::core::{Flow, TreeBuilder};
use crate::parser::quirks::quirks_mode_for_doctype;
use crate::tokenizer::{Token, TokenizerState};

impl TreeBuilder {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(crate) fn initial_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            //  U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            //  RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if is_whitespace(*data) => Flow::Done,

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.append_comment(NodeId::ROOT, data);
                Flow::Done
            }

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                // "If the DOCTYPE token's name is not "html", or the token's
                //  public identifier is not missing, or the token's system
                //  identifier is neither missing nor "about:legacy-compat",
                //  then there is a parse error."
                let conforming = name.as_deref() == Some("html")
                    && public_identifier.is_none()
                    && system_identifier
                        .as_deref()
                        .is_none_or(|system| system == "about:legacy-compat");
                if !conforming {
                    self.parse_error(ErrorKind::NonConformingDoctype);
                }

                // "Append a DocumentType node to the Document node, with its
                //  name set to the name given in the DOCTYPE token, or the
                //  empty string if the name was missing; its public ID set to
                //  the public identifier given in the DOCTYPE token, or the
                //  empty string if the public identifier was missing; and its
                //  system ID set to the system identifier given in the DOCTYPE
                //  token, or the empty string if the system identifier was
                //  missing."
                let doctype = self.tree.alloc(NodeType::DocumentType(DoctypeData {
                    name: name.clone().unwrap_or_default(),
                    public_id: public_identifier.clone().unwrap_or_default(),
                    system_id: system_identifier.clone().unwrap_or_default(),
                }));
                self.tree.append_child(NodeId::ROOT, doctype);

                // "Then, if the document is not an iframe srcdoc document, and
                //  the parser cannot change the mode flag is false, and the
                //  DOCTYPE token matches one of the conditions in the
                //  following list, then set the Document to quirks mode"
                let mode = quirks_mode_for_doctype(
                    name.as_deref(),
                    public_identifier.as_deref(),
                    system_identifier.as_deref(),
                    *force_quirks,
                );
                self.tree.set_quirks_mode(mode);

                // "Then, switch the insertion mode to "before html"."
                self.switch_mode(InsertionMode::BeforeHtml);
                Flow::Done
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is
            //  a parse error; if the parser cannot change the mode flag is
            //  false, set the Document to quirks mode."
            // "In any case, switch the insertion mode to "before html", then
            //  reprocess the token."
            _ => {
                self.parse_error(ErrorKind::MissingDoctype);
                self.tree.set_quirks_mode(QuirksMode::Quirks);
                self.switch_mode(InsertionMode::BeforeHtml);
                Flow::Reprocess
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(crate) fn before_html_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error(ErrorKind::UnexpectedDoctype);
                Flow::Done
            }

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.append_comment(NodeId::ROOT, data);
                Flow::Done
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Ignore the token."
            Token::Character { data } if is_whitespace(*data) => Flow::Done,

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            //  Document as the intended parent. Append it to the Document
            //  object. Put this element in the stack of open elements."
            // "Switch the insertion mode to "before head"."
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let html = self.create_element(name, attributes, Namespace::Html);
                self.tree.append_child(NodeId::ROOT, html);
                self.push_open_element(html);
                self.switch_mode(InsertionMode::BeforeHead);
                Flow::Done
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.before_html_anything_else()
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => {
                self.parse_error(ErrorKind::UnexpectedEndTag);
                Flow::Done
            }

            // "Anything else"
            _ => self.before_html_anything_else(),
        }
    }

    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of open
    /// elements. Switch the insertion mode to "before head", then reprocess the
    /// token."
    fn before_html_anything_else(&mut self) -> Flow {
        let html = self.create_element("html", &[], Namespace::Html);
        self.tree.append_child(NodeId::ROOT, html);
        self.push_open_element(html);
        self.switch_mode(InsertionMode::BeforeHead);
        Flow::Reprocess
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(crate) fn before_head_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Ignore the token."
            Token::Character { data } if is_whitespace(*data) => Flow::Done,

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

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => self.in_body_mode(token),

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            Token::StartTag {
                name, attributes, ..
            } if name == "head" => {
                let head = self.insert_html_element(name, attributes);
                self.ctx.head_element = Some(head);
                self.switch_mode(InsertionMode::InHead);
                Flow::Done
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.before_head_anything_else()
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => {
                self.parse_error(ErrorKind::UnexpectedEndTag);
                Flow::Done
            }

            // "Anything else"
            _ => self.before_head_anything_else(),
        }
    }

    /// "Insert an HTML element for a "head" start tag token with no
    /// attributes. Set the head element pointer to the newly created head
    /// element. Switch the insertion mode to "in head". Reprocess the current
    /// token."
    fn before_head_anything_else(&mut self) -> Flow {
        let head = self.insert_html_element("head", &[]);
        self.ctx.head_element = Some(head);
        self.switch_mode(InsertionMode::InHead);
        Flow::Reprocess
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(crate) fn in_head_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            Token::Character { data } if is_whitespace(*data) => {
                self.insert_character(*data);
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
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => self.in_body_mode(token),

                // "A start tag whose tag name is one of: "base", "basefont",
                //  "bgsound", "link""
                // "Insert an HTML element for the token. Immediately pop the
                //  current node off the stack of open elements."
                // "Acknowledge the token's self-closing flag, if it is set."
                //
                // "A start tag whose tag name is "meta"" does the same; the
                // encoding is already decided.
                "base" | "basefont" | "bgsound" | "link" | "meta" => {
                    let _ = self.insert_html_element(name, attributes);
                    let _ = self.stack.pop();
                    Flow::Done
                }

                // "A start tag whose tag name is "title""
                // "Follow the generic RCDATA element parsing algorithm."
                "title" => {
                    self.parse_text_element(name, attributes, TokenizerState::RCDATA);
                    Flow::Done
                }

                // "A start tag whose tag name is "noscript", if the scripting
                //  flag is enabled"
                // "A start tag whose tag name is one of: "noframes", "style""
                // "Follow the generic raw text element parsing algorithm."
                "noscript" if self.ctx.scripting => {
                    self.parse_text_element(name, attributes, TokenizerState::RAWTEXT);
                    Flow::Done
                }
                "noframes" | "style" => {
                    self.parse_text_element(name, attributes, TokenizerState::RAWTEXT);
                    Flow::Done
                }

                // "A start tag whose tag name is "noscript", if the scripting
                //  flag is disabled"
                // "Insert an HTML element for the token."
                // "Switch the insertion mode to "in head noscript"."
                "noscript" => {
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_mode(InsertionMode::InHeadNoscript);
                    Flow::Done
                }

                // "A start tag whose tag name is "script""
                // STEP 1: "Let the adjusted insertion location be the
                //          appropriate place for inserting a node."
                // STEP 2-7: "Create an element for the token ... Insert the
                //            newly created element at the adjusted insertion
                //            location. Push the element onto the stack of open
                //            elements so that it is the new current node."
                // STEP 8: "Switch the tokenizer to the script data state."
                // STEP 9: "Let the original insertion mode be the current
                //          insertion mode."
                // STEP 10: "Switch the insertion mode to "text"."
                "script" => {
                    self.parse_text_element(name, attributes, TokenizerState::ScriptData);
                    Flow::Done
                }

                // "A start tag whose tag name is "template""
                "template" => {
                    self.start_template(name, attributes);
                    Flow::Done
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => {
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    Flow::Done
                }

                _ => self.in_head_anything_else(),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "head""
                // "Pop the current node (which will be the head element) off
                //  the stack of open elements."
                // "Switch the insertion mode to "after head"."
                "head" => {
                    let _ = self.stack.pop();
                    self.switch_mode(InsertionMode::AfterHead);
                    Flow::Done
                }

                // "An end tag whose tag name is one of: "body", "html", "br""
                // "Act as described in the "anything else" entry below."
                "body" | "html" | "br" => self.in_head_anything_else(),

                // "An end tag whose tag name is "template""
                "template" => {
                    self.end_template();
                    Flow::Done
                }

                // "Any other end tag"
                // "Parse error. Ignore the token."
                _ => {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    Flow::Done
                }
            },

            _ => self.in_head_anything_else(),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack
    /// of open elements. Switch the insertion mode to "after head". Reprocess
    /// the token."
    fn in_head_anything_else(&mut self) -> Flow {
        let _ = self.stack.pop();
        self.switch_mode(InsertionMode::AfterHead);
        Flow::Reprocess
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(crate) fn in_head_noscript_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.parse_error(ErrorKind::UnexpectedDoctype);
                Flow::Done
            }

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => self.in_body_mode(token),

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from
            //  the stack of open elements; the new current node will be a head
            //  element."
            // "Switch the insertion mode to "in head"."
            Token::EndTag { name } if name == "noscript" => {
                let _ = self.stack.pop();
                self.switch_mode(InsertionMode::InHead);
                Flow::Done
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "A comment token"
            // "A start tag whose tag name is one of: "basefont", "bgsound",
            //  "link", "meta", "noframes", "style""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::Character { data } if is_whitespace(*data) => self.in_head_mode(token),
            Token::Comment { .. } => self.in_head_mode(token),
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.in_head_mode(token)
            }

            // "An end tag whose tag name is "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name } if name == "br" => self.in_head_noscript_anything_else(),

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" || name == "noscript" => {
                self.parse_error(ErrorKind::UnexpectedStartTag);
                Flow::Done
            }
            Token::EndTag { .. } => {
                self.parse_error(ErrorKind::UnexpectedEndTag);
                Flow::Done
            }

            _ => self.in_head_noscript_anything_else(),
        }
    }

    /// "Parse error. Pop the current node (which will be a noscript element)
    /// from the stack of open elements; the new current node will be a head
    /// element. Switch the insertion mode to "in head". Reprocess the token."
    fn in_head_noscript_anything_else(&mut self) -> Flow {
        self.parse_error(ErrorKind::UnexpectedCharacter);
        let _ = self.stack.pop();
        self.switch_mode(InsertionMode::InHead);
        Flow::Reprocess
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(crate) fn after_head_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            Token::Character { data } if is_whitespace(*data) => {
                self.insert_character(*data);
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
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => self.in_body_mode(token),

                // "A start tag whose tag name is "body""
                // "Insert an HTML element for the token."
                // "Set the frameset-ok flag to "not ok"."
                // "Switch the insertion mode to "in body"."
                "body" => {
                    let _ = self.insert_html_element(name, attributes);
                    self.ctx.frameset_ok = false;
                    self.switch_mode(InsertionMode::InBody);
                    Flow::Done
                }

                // "A start tag whose tag name is "frameset""
                // "Insert an HTML element for the token."
                // "Switch the insertion mode to "in frameset"."
                "frameset" => {
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_mode(InsertionMode::InFrameset);
                    Flow::Done
                }

                // "A start tag whose tag name is one of: "base", "basefont",
                //  "bgsound", "link", "meta", "noframes", "script", "style",
                //  "template", "title""
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "template" | "title" => {
                    // "Parse error."
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    let Some(head) = self.ctx.head_element else {
                        return self.in_head_mode(token);
                    };
                    // "Push the node pointed to by the head element pointer
                    //  onto the stack of open elements."
                    self.push_open_element(head);
                    // "Process the token using the rules for the "in head"
                    //  insertion mode."
                    let flow = self.in_head_mode(token);
                    // "Remove the node pointed to by the head element pointer
                    //  from the stack of open elements. (It might not be the
                    //  current node at this point.)"
                    let _ = self.stack.remove_element(head);
                    flow
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => {
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    Flow::Done
                }

                _ => self.after_head_anything_else(),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "template" => self.in_head_mode(token),

                // "An end tag whose tag name is one of: "body", "html", "br""
                // "Act as described in the "anything else" entry below."
                "body" | "html" | "br" => self.after_head_anything_else(),

                // "Any other end tag"
                // "Parse error. Ignore the token."
                _ => {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    Flow::Done
                }
            },

            _ => self.after_head_anything_else(),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no
    /// attributes. Switch the insertion mode to "in body". Reprocess the
    /// current token."
    fn after_head_anything_else(&mut self) -> Flow {
        let _ = self.insert_html_element("body", &[]);
        self.switch_mode(InsertionMode::InBody);
        Flow::Reprocess
    }
}
