//! Templates: the `template` start and end tag steps and the "in template"
//! insertion mode.

use crate::error::ErrorKind;
use crate::parser::context::InsertionMode;
use crate::parser::core::{Flow, TreeBuilder};
use crate::tokenizer::{Attribute, Token};

impl TreeBuilder {
    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "A start tag whose tag name is "template""
    pub(crate) fn start_template(&mut self, name: &str, attributes: &[Attribute]) {
        // STEP 1-6: "Let template be the result of inserting a foreign element
        //            for the token ... in the HTML namespace". Its template
        //            contents are allocated with it.
        let _ = self.insert_html_element(name, attributes);
        // STEP 7: "Insert a marker at the end of the list of active formatting
        //          elements."
        self.formatting.insert_marker();
        // STEP 8: "Set the frameset-ok flag to "not ok"."
        self.ctx.frameset_ok = false;
        // STEP 9: "Switch the insertion mode to "in template"."
        self.switch_mode(InsertionMode::InTemplate);
        // STEP 10: "Push "in template" onto the stack of template insertion
        //           modes so that it is the new current template insertion
        //           mode."
        self.ctx.template_modes.push(InsertionMode::InTemplate);
    }

    /// [§ 13.2.6.4.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "An end tag whose tag name is "template""
    pub(crate) fn end_template(&mut self) {
        // "If there is no template element on the stack of open elements, then
        //  this is a parse error; ignore the token."
        if !self.stack.contains_tag(&self.tree, "template") {
            self.parse_error(ErrorKind::UnexpectedEndTag);
            return;
        }
        // STEP 1: "Generate all implied end tags thoroughly."
        self.stack
            .generate_all_implied_end_tags_thoroughly(&self.tree);
        // STEP 2: "If the current node is not a template element, then this is
        //          a parse error."
        if !self.current_is("template") {
            self.parse_error(ErrorKind::EndTagNotCurrentNode);
        }
        // STEP 3: "Pop elements from the stack of open elements until a
        //          template element has been popped from the stack."
        self.pop_until("template");
        // STEP 4: "Clear the list of active formatting elements up to the last
        //          marker."
        self.formatting.clear_to_last_marker();
        // STEP 5: "Pop the current template insertion mode off the stack of
        //          template insertion modes."
        let _ = self.ctx.template_modes.pop();
        // STEP 6: "Reset the insertion mode appropriately."
        self.reset_insertion_mode_appropriately();
    }

    /// Replace the current template insertion mode with `mode`, switch to it
    /// and reprocess.
    fn retarget_template(&mut self, mode: InsertionMode) -> Flow {
        // "Pop the current template insertion mode off the stack of template
        //  insertion modes."
        let _ = self.ctx.template_modes.pop();
        // "Push "X" onto the stack of template insertion modes so that it is
        //  the new current template insertion mode."
        self.ctx.template_modes.push(mode);
        // "Switch the insertion mode to "X", and reprocess the token."
        self.switch_mode(mode);
        Flow::Reprocess
    }

    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    pub(crate) fn in_template_mode(&mut self, token: &Token) -> Flow {
        match token {
            // "A character token"
            // "A comment token"
            // "A DOCTYPE token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Character { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                self.in_body_mode(token)
            }

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is one of: "base", "basefont",
                //  "bgsound", "link", "meta", "noframes", "script", "style",
                //  "template", "title""
                // "Process the token using the rules for the "in head" insertion mode."
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "template" | "title" => self.in_head_mode(token),

                // "A start tag whose tag name is one of: "caption", "colgroup",
                //  "tbody", "tfoot", "thead""
                "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    self.retarget_template(InsertionMode::InTable)
                }

                // "A start tag whose tag name is "col""
                "col" => self.retarget_template(InsertionMode::InColumnGroup),

                // "A start tag whose tag name is "tr""
                "tr" => self.retarget_template(InsertionMode::InTableBody),

                // "A start tag whose tag name is one of: "td", "th""
                "td" | "th" => self.retarget_template(InsertionMode::InRow),

                // "Any other start tag"
                _ => self.retarget_template(InsertionMode::InBody),
            },

            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::EndTag { name } if name == "template" => self.in_head_mode(token),

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => {
                self.parse_error(ErrorKind::UnexpectedEndTag);
                Flow::Done
            }

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If there is no template element on the stack of open
                //  elements, then stop parsing. (fragment case)"
                if !self.stack.contains_tag(&self.tree, "template") {
                    self.stop_parsing();
                    return Flow::Done;
                }
                // "Otherwise, this is a parse error."
                self.parse_error(ErrorKind::EofWithUnclosedElements);
                // "Pop elements from the stack of open elements until a
                //  template element has been popped from the stack."
                self.pop_until("template");
                // "Clear the list of active formatting elements up to the last
                //  marker."
                self.formatting.clear_to_last_marker();
                // "Pop the current template insertion mode off the stack of
                //  template insertion modes."
                let _ = self.ctx.template_modes.pop();
                // "Reset the insertion mode appropriately."
                self.reset_insertion_mode_appropriately();
                // "Reprocess the token."
                Flow::Reprocess
            }
        }
    }
}
