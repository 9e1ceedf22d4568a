//! Tables: "in table" through "in cell".

use std::mem;

use super::is_whitespace;
use crate::error::ErrorKind;
use crate::parser::context::InsertionMode;
use crate::parser::core::{Flow, TreeBuilder};
use crate::parser::stack::ScopeKind;
use crate::tokenizer::Token;

const TABLE_CONTEXT: &[&str] = &["table", "template", "html"];
const TABLE_BODY_CONTEXT: &[&str] = &["tbody", "tfoot", "thead", "template", "html"];
const TABLE_ROW_CONTEXT: &[&str] = &["tr", "template", "html"];
const TABLE_SECTIONS: &[&str] = &["tbody", "thead", "tfoot"];

impl TreeBuilder {
    fn clear_stack_back_to(&mut self, context: &[&str]) {
        self.stack.clear_back_to(&self.tree, context);
    }

    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(crate) fn in_table_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token, if the current node is table, tbody,
            //  template, tfoot, thead, or tr element"
            Token::Character { .. }
                if self.current_is_one_of(&["table", "tbody", "template", "tfoot", "thead", "tr"]) =>
            {
                // "Let the pending table character tokens be an empty list of
                //  tokens."
                self.pending_table_text.clear();
                // "Let the original insertion mode be the current insertion mode."
                self.ctx.original_insertion_mode = Some(self.ctx.insertion_mode);
                // "Switch the insertion mode to "in table text" and reprocess
                //  the token."
                self.switch_mode(InsertionMode::InTableText);
                Flow::Reprocess
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
                // "A start tag whose tag name is "caption""
                // "Clear the stack back to a table context."
                // "Insert a marker at the end of the list of active formatting
                //  elements."
                // "Insert an HTML element for the token, then switch the
                //  insertion mode to "in caption"."
                "caption" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    self.formatting.insert_marker();
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_mode(InsertionMode::InCaption);
                    Flow::Done
                }

                // "A start tag whose tag name is "colgroup""
                "colgroup" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_mode(InsertionMode::InColumnGroup);
                    Flow::Done
                }

                // "A start tag whose tag name is "col""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for a "colgroup" start tag token
                //  with no attributes, then switch the insertion mode to "in
                //  column group"."
                // "Reprocess the current token."
                "col" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element("colgroup", &[]);
                    self.switch_mode(InsertionMode::InColumnGroup);
                    Flow::Reprocess
                }

                // "A start tag whose tag name is one of: "tbody", "tfoot", "thead""
                "tbody" | "tfoot" | "thead" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_mode(InsertionMode::InTableBody);
                    Flow::Done
                }

                // "A start tag whose tag name is one of: "td", "th", "tr""
                // "Insert an HTML element for a "tbody" start tag token with
                //  no attributes, then switch the insertion mode to "in table
                //  body"."
                // "Reprocess the current token."
                "td" | "th" | "tr" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element("tbody", &[]);
                    self.switch_mode(InsertionMode::InTableBody);
                    Flow::Reprocess
                }

                // "A start tag whose tag name is "table""
                "table" => {
                    // "Parse error."
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    // "If the stack of open elements does not have a table
                    //  element in table scope, ignore the token."
                    if !self.in_scope("table", ScopeKind::Table) {
                        return Flow::Done;
                    }
                    // "Otherwise: Pop elements from this stack until a table
                    //  element has been popped from the stack."
                    // "Reset the insertion mode appropriately."
                    // "Reprocess the token."
                    self.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                    Flow::Reprocess
                }

                // "A start tag whose tag name is one of: "style", "script",
                //  "template""
                // "Process the token using the rules for the "in head"
                //  insertion mode."
                "style" | "script" | "template" => self.in_head_mode(token),

                // "A start tag whose tag name is "input""
                // "If the token does not have an attribute with the name
                //  "type", or if it does, but that attribute's value is not an
                //  ASCII case-insensitive match for the string "hidden", then:
                //  act as described in the "anything else" entry below."
                // "Otherwise: Parse error. Insert an HTML element for the
                //  token. Pop that input element off the stack of open
                //  elements. Acknowledge the token's self-closing flag, if it
                //  is set."
                "input"
                    if token
                        .attribute("type")
                        .is_some_and(|t| t.eq_ignore_ascii_case("hidden")) =>
                {
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    let _ = self.insert_html_element(name, attributes);
                    let _ = self.stack.pop();
                    Flow::Done
                }

                // "A start tag whose tag name is "form""
                "form" => {
                    // "Parse error."
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    // "If there is a template element on the stack of open
                    //  elements, or if the form element pointer is not null,
                    //  ignore the token."
                    if self.stack.contains_tag(&self.tree, "template")
                        || self.ctx.form_element.is_some()
                    {
                        return Flow::Done;
                    }
                    // "Otherwise: Insert an HTML element for the token, and
                    //  set the form element pointer to point to the element
                    //  created."
                    // "Pop that form element off the stack of open elements."
                    let form = self.insert_html_element(name, attributes);
                    self.ctx.form_element = Some(form);
                    let _ = self.stack.pop();
                    Flow::Done
                }

                _ => self.in_table_anything_else(token),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "table""
                "table" => {
                    // "If the stack of open elements does not have a table
                    //  element in table scope, this is a parse error; ignore
                    //  the token."
                    if !self.in_scope("table", ScopeKind::Table) {
                        self.parse_error(ErrorKind::UnexpectedEndTag);
                        return Flow::Done;
                    }
                    // "Otherwise: Pop elements from this stack until a table
                    //  element has been popped from the stack."
                    // "Reset the insertion mode appropriately."
                    self.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                    Flow::Done
                }

                // "An end tag whose tag name is one of: "body", "caption",
                //  "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                //  "thead", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                | "th" | "thead" | "tr" => {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    Flow::Done
                }

                // "An end tag whose tag name is "template""
                "template" => self.in_head_mode(token),

                _ => self.in_table_anything_else(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => self.in_body_mode(token),

            Token::Character { .. } => self.in_table_anything_else(token),
        }
    }

    /// "Anything else" in table: "Parse error. Enable foster parenting,
    /// process the token using the rules for the "in body" insertion mode, and
    /// then disable foster parenting."
    fn in_table_anything_else(&mut self, token: &Token) -> Flow {
        self.parse_error(ErrorKind::FosterParentedContent);
        self.with_foster_parenting(token)
    }

    fn with_foster_parenting(&mut self, token: &Token) -> Flow {
        self.ctx.foster_parenting = true;
        let flow = self.in_body_mode(token);
        self.ctx.foster_parenting = false;
        flow
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(crate) fn in_table_text_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                Flow::Done
            }

            // "Any other character token"
            // "Append the character token to the pending table character
            //  tokens list."
            Token::Character { data } => {
                self.pending_table_text.push(*data);
                Flow::Done
            }

            // "Anything else"
            _ => {
                let pending = mem::take(&mut self.pending_table_text);
                // "If any of the tokens in the pending table character tokens
                //  list are character tokens that are not ASCII whitespace,
                //  then this is a parse error: reprocess the character tokens
                //  in the pending table character tokens list using the rules
                //  given in the "anything else" entry in the "in table"
                //  insertion mode."
                if pending.iter().any(|&c| !is_whitespace(c)) {
                    self.parse_error(ErrorKind::FosterParentedContent);
                    for data in pending {
                        let _ = self.with_foster_parenting(&Token::Character { data });
                    }
                } else {
                    // "Otherwise, insert the characters given by the pending
                    //  table character tokens list."
                    for data in pending {
                        self.insert_character(data);
                    }
                }
                // "Switch the insertion mode to the original insertion mode
                //  and reprocess the token."
                let mode = self
                    .ctx
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InTable);
                self.switch_mode(mode);
                Flow::Reprocess
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(crate) fn in_caption_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name } if name == "caption" => {
                let _ = self.close_caption();
                Flow::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                self.close_caption_and_reprocess()
            }
            Token::EndTag { name } if name == "table" => self.close_caption_and_reprocess(),

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            //  "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name }
                if matches!(
                    name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
                        | "thead" | "tr"
                ) =>
            {
                self.parse_error(ErrorKind::UnexpectedEndTag);
                Flow::Done
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.in_body_mode(token),
        }
    }

    /// The "caption" end tag steps. Returns whether a caption was closed.
    fn close_caption(&mut self) -> bool {
        // "If the stack of open elements does not have a caption element in
        //  table scope, this is a parse error; ignore the token. (fragment
        //  case)"
        if !self.in_scope("caption", ScopeKind::Table) {
            self.parse_error(ErrorKind::UnexpectedEndTag);
            return false;
        }
        // "Generate implied end tags."
        self.generate_implied_end_tags(None);
        // "Now, if the current node is not a caption element, then this is a
        //  parse error."
        if !self.current_is("caption") {
            self.parse_error(ErrorKind::EndTagNotCurrentNode);
        }
        // "Pop elements from this stack until a caption element has been
        //  popped from the stack."
        self.pop_until("caption");
        // "Clear the list of active formatting elements up to the last marker."
        self.formatting.clear_to_last_marker();
        // "Switch the insertion mode to "in table"."
        self.switch_mode(InsertionMode::InTable);
        true
    }

    /// "If the stack of open elements does not have a caption element in table
    /// scope, this is a parse error; ignore the token. (fragment case)"
    /// "Otherwise: ... Reprocess the token."
    fn close_caption_and_reprocess(&mut self) -> Flow {
        if self.close_caption() {
            Flow::Reprocess
        } else {
            Flow::Done
        }
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(crate) fn in_column_group_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, ..."
            // "Insert the character."
            Token::Character { data } if is_whitespace(*data) => {
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

            // "A start tag whose tag name is "html""
            Token::StartTag { name, .. } if name == "html" => self.in_body_mode(token),

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the
            //  current node off the stack of open elements."
            Token::StartTag {
                name, attributes, ..
            } if name == "col" => {
                let _ = self.insert_html_element(name, attributes);
                let _ = self.stack.pop();
                Flow::Done
            }

            // "An end tag whose tag name is "colgroup""
            // "If the current node is not a colgroup element, then this is a
            //  parse error; ignore the token."
            // "Otherwise, pop the current node from the stack of open
            //  elements. Switch the insertion mode to "in table"."
            Token::EndTag { name } if name == "colgroup" => {
                if self.current_is("colgroup") {
                    let _ = self.stack.pop();
                    self.switch_mode(InsertionMode::InTable);
                } else {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                }
                Flow::Done
            }

            // "An end tag whose tag name is "col""
            Token::EndTag { name } if name == "col" => {
                self.parse_error(ErrorKind::UnexpectedEndTag);
                Flow::Done
            }

            // "A start tag whose tag name is "template""
            // "An end tag whose tag name is "template""
            Token::StartTag { name, .. } | Token::EndTag { name } if name == "template" => {
                self.in_head_mode(token)
            }

            // "An end-of-file token"
            Token::EndOfFile => self.in_body_mode(token),

            // "Anything else"
            // "If the current node is not a colgroup element, then this is a
            //  parse error; ignore the token."
            // "Otherwise, pop the current node from the stack of open elements.
            //  Switch the insertion mode to "in table". Reprocess the token."
            _ => {
                if !self.current_is("colgroup") {
                    self.parse_error(ErrorKind::UnexpectedCharacter);
                    return Flow::Done;
                }
                let _ = self.stack.pop();
                self.switch_mode(InsertionMode::InTable);
                Flow::Reprocess
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(crate) fn in_table_body_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is "tr""
                // "Clear the stack back to a table body context."
                // "Insert an HTML element for the token, then switch the
                //  insertion mode to "in row"."
                "tr" => {
                    self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_mode(InsertionMode::InRow);
                    Flow::Done
                }

                // "A start tag whose tag name is one of: "th", "td""
                // "Parse error."
                // "Clear the stack back to a table body context."
                // "Insert an HTML element for a "tr" start tag token with no
                //  attributes, then switch the insertion mode to "in row"."
                // "Reprocess the current token."
                "th" | "td" => {
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                    let _ = self.insert_html_element("tr", &[]);
                    self.switch_mode(InsertionMode::InRow);
                    Flow::Reprocess
                }

                // "A start tag whose tag name is one of: "caption", "col",
                //  "colgroup", "tbody", "tfoot", "thead""
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    self.leave_table_body()
                }

                _ => self.in_table_mode(token),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
                "tbody" | "tfoot" | "thead" => {
                    // "If the stack of open elements does not have an element
                    //  in table scope that is an HTML element with the same tag
                    //  name as the token, this is a parse error; ignore the
                    //  token."
                    if !self.in_scope(name, ScopeKind::Table) {
                        self.parse_error(ErrorKind::UnexpectedEndTag);
                        return Flow::Done;
                    }
                    // "Otherwise: Clear the stack back to a table body context."
                    // "Pop the current node from the stack of open elements.
                    //  Switch the insertion mode to "in table"."
                    self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                    let _ = self.stack.pop();
                    self.switch_mode(InsertionMode::InTable);
                    Flow::Done
                }

                // "An end tag whose tag name is "table""
                "table" => self.leave_table_body(),

                // "An end tag whose tag name is one of: "body", "caption",
                //  "col", "colgroup", "html", "td", "th", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr" => {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    Flow::Done
                }

                _ => self.in_table_mode(token),
            },

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => self.in_table_mode(token),
        }
    }

    /// Table section exit shared by several table body entries.
    fn leave_table_body(&mut self) -> Flow {
        // "If the stack of open elements does not have a tbody, thead, or
        //  tfoot element in table scope, this is a parse error; ignore the
        //  token."
        if !self
            .stack
            .has_any_in_scope(&self.tree, TABLE_SECTIONS, ScopeKind::Table)
        {
            self.parse_error(ErrorKind::UnexpectedStartTag);
            return Flow::Done;
        }
        // "Otherwise: Clear the stack back to a table body context."
        // "Pop the current node from the stack of open elements. Switch the
        //  insertion mode to "in table"."
        // "Reprocess the token."
        self.clear_stack_back_to(TABLE_BODY_CONTEXT);
        let _ = self.stack.pop();
        self.switch_mode(InsertionMode::InTable);
        Flow::Reprocess
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(crate) fn in_row_mode(&mut self, token: &Token) -> Flow {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => match name.as_str() {
                // "A start tag whose tag name is one of: "th", "td""
                // "Clear the stack back to a table row context."
                // "Insert an HTML element for the token, then switch the
                //  insertion mode to "in cell"."
                // "Insert a marker at the end of the list of active formatting
                //  elements."
                "th" | "td" => {
                    self.clear_stack_back_to(TABLE_ROW_CONTEXT);
                    let _ = self.insert_html_element(name, attributes);
                    self.switch_mode(InsertionMode::InCell);
                    self.formatting.insert_marker();
                    Flow::Done
                }

                // "A start tag whose tag name is one of: "caption", "col",
                //  "colgroup", "tbody", "tfoot", "thead", "tr""
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr" => {
                    if self.close_row(ErrorKind::UnexpectedStartTag) {
                        Flow::Reprocess
                    } else {
                        Flow::Done
                    }
                }

                _ => self.in_table_mode(token),
            },

            Token::EndTag { name } => match name.as_str() {
                // "An end tag whose tag name is "tr""
                "tr" => {
                    let _ = self.close_row(ErrorKind::UnexpectedEndTag);
                    Flow::Done
                }

                // "An end tag whose tag name is "table""
                "table" => {
                    if self.close_row(ErrorKind::UnexpectedEndTag) {
                        Flow::Reprocess
                    } else {
                        Flow::Done
                    }
                }

                // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
                "tbody" | "tfoot" | "thead" => {
                    // "If the stack of open elements does not have an element
                    //  in table scope that is an HTML element with the same tag
                    //  name as the token, this is a parse error; ignore the
                    //  token."
                    if !self.in_scope(name, ScopeKind::Table) {
                        self.parse_error(ErrorKind::UnexpectedEndTag);
                        return Flow::Done;
                    }
                    // "If the stack of open elements does not have a tr
                    //  element in table scope, ignore the token."
                    // "Otherwise: ... Reprocess the token."
                    if self.close_row(ErrorKind::UnexpectedEndTag) {
                        Flow::Reprocess
                    } else {
                        Flow::Done
                    }
                }

                // "An end tag whose tag name is one of: "body", "caption",
                //  "col", "colgroup", "html", "td", "th""
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" => {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    Flow::Done
                }

                _ => self.in_table_mode(token),
            },

            // "Anything else"
            _ => self.in_table_mode(token),
        }
    }

    /// The "tr" end tag steps. Returns whether a row was closed; reports
    /// `error` when there is no row to close.
    fn close_row(&mut self, error: ErrorKind) -> bool {
        // "If the stack of open elements does not have a tr element in table
        //  scope, this is a parse error; ignore the token."
        if !self.in_scope("tr", ScopeKind::Table) {
            self.parse_error(error);
            return false;
        }
        // "Otherwise: Clear the stack back to a table row context."
        // "Pop the current node (which will be a tr element) from the stack of
        //  open elements. Switch the insertion mode to "in table body"."
        self.clear_stack_back_to(TABLE_ROW_CONTEXT);
        let _ = self.stack.pop();
        self.switch_mode(InsertionMode::InTableBody);
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(crate) fn in_cell_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag { name } if name == "td" || name == "th" => {
                // "If the stack of open elements does not have an element in
                //  table scope that is an HTML element with the same tag name
                //  as that of the token, then this is a parse error; ignore
                //  the token."
                if !self.in_scope(name, ScopeKind::Table) {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    return Flow::Done;
                }
                // "Generate implied end tags."
                self.generate_implied_end_tags(None);
                // "Now, if the current node is not an HTML element with the
                //  same tag name as the token, then this is a parse error."
                if !self.current_is(name) {
                    self.parse_error(ErrorKind::EndTagNotCurrentNode);
                }
                // "Pop elements from the stack of open elements stack until an
                //  HTML element with the same tag name as the token has been
                //  popped from the stack."
                self.pop_until(name);
                // "Clear the list of active formatting elements up to the last
                //  marker."
                self.formatting.clear_to_last_marker();
                // "Switch the insertion mode to "in row"."
                self.switch_mode(InsertionMode::InRow);
                Flow::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            //  "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                // "Assert: The stack of open elements has a td or th element in
                //  table scope."
                // "Close the cell and reprocess the token."
                if !self
                    .stack
                    .has_any_in_scope(&self.tree, &["td", "th"], ScopeKind::Table)
                {
                    self.parse_error(ErrorKind::UnexpectedStartTag);
                    return Flow::Done;
                }
                self.close_cell();
                Flow::Reprocess
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            //  "colgroup", "html""
            // "Parse error. Ignore the token."
            Token::EndTag { name }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html"
                ) =>
            {
                self.parse_error(ErrorKind::UnexpectedEndTag);
                Flow::Done
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            //  "thead", "tr""
            // "If the stack of open elements does not have an element in table
            //  scope that is an HTML element with the same tag name as that of
            //  the token, then this is a parse error; ignore the token."
            // "Otherwise, close the cell and reprocess the token."
            Token::EndTag { name }
                if matches!(
                    name.as_str(),
                    "table" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                if !self.in_scope(name, ScopeKind::Table) {
                    self.parse_error(ErrorKind::UnexpectedEndTag);
                    return Flow::Done;
                }
                self.close_cell();
                Flow::Reprocess
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.in_body_mode(token),
        }
    }

    /// [§ 13.2.6.4.15](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    ///
    /// "Where the steps above say to close the cell, they mean to run the
    /// following algorithm:"
    fn close_cell(&mut self) {
        // STEP 1: "Generate implied end tags."
        self.generate_implied_end_tags(None);
        // STEP 2: "If the current node is not now a td element or a th
        //          element, then this is a parse error."
        if !self.current_is_one_of(&["td", "th"]) {
            self.parse_error(ErrorKind::EndTagNotCurrentNode);
        }
        // STEP 3: "Pop elements from the stack of open elements stack until a
        //          td element or a th element has been popped from the stack."
        self.stack.pop_until_one_of(&self.tree, &["td", "th"]);
        // STEP 4: "Clear the list of active formatting elements up to the last
        //          marker."
        self.formatting.clear_to_last_marker();
        // STEP 5: "Switch the insertion mode to "in row"."
        self.switch_mode(InsertionMode::InRow);
    }
}
