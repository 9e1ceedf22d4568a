//! [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
//!
//! Repairs misnested formatting elements such as `<b>1<i>2</b>3</i>`,
//! cloning the formatting element around the content that was opened
//! inside it.

use canopy_dom::{Namespace, NodeId};

use crate::error::ErrorKind;
use crate::parser::core::{TreeBuilder, is_special};
use crate::parser::stack::ScopeKind;
use crate::tokenizer::Token;

const OUTER_LOOP_LIMIT: usize = 8;
const INNER_LOOP_LIMIT: usize = 3;

impl TreeBuilder {
    /// "The adoption agency algorithm, which takes as its only argument a
    /// token token for which the algorithm is being run, consists of the
    /// following steps:"
    pub(crate) fn run_adoption_agency(&mut self, subject: &str) {
        // STEP 2: "If the current node is an HTML element whose tag name is
        //          subject, and the current node is not in the list of active
        //          formatting elements, then pop the current node off the stack
        //          of open elements and return."
        if let Some(current) = self.current_node()
            && self.node_is(current, subject)
            && !self.formatting.contains(current)
        {
            let _ = self.stack.pop();
            return;
        }

        // STEP 3: "Let outer loop counter be 0."
        // STEP 4: "While true:"
        for _ in 0..OUTER_LOOP_LIMIT {
            // STEP 4.3: "Let formatting element be the last element in the list
            //            of active formatting elements that: is between the end
            //            of the list and the last marker in the list, if any,
            //            or the start of the list otherwise, and has the tag
            //            name subject."
            //            "If there is no such element, then return and instead
            //            act as described in the "any other end tag" entry
            //            above."
            let Some(formatting_element) = self.formatting.last_named_after_marker(subject)
            else {
                self.any_other_end_tag(subject);
                return;
            };

            // STEP 4.4: "If formatting element is not in the stack of open
            //            elements, then this is a parse error; remove the
            //            element from the list, and return."
            let Some(formatting_index) = self.stack.position(formatting_element) else {
                self.parse_error(ErrorKind::MisnestedFormattingElement);
                let _ = self.formatting.remove(formatting_element);
                return;
            };

            // STEP 4.5: "If formatting element is in the stack of open
            //            elements, but the element is not in scope, then this
            //            is a parse error; return."
            if !self
                .stack
                .has_node_in_scope(&self.tree, formatting_element, ScopeKind::Default)
            {
                self.parse_error(ErrorKind::MisnestedFormattingElement);
                return;
            }

            // STEP 4.6: "If formatting element is not the current node, this
            //            is a parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error(ErrorKind::MisnestedFormattingElement);
            }

            // STEP 4.7: "Let furthest block be the topmost node in the stack of
            //            open elements that is lower in the stack than
            //            formatting element, and is an element in the special
            //            category. There might not be one."
            let furthest_block = self.stack.as_slice()[formatting_index + 1..]
                .iter()
                .copied()
                .find(|&node| self.tree.as_element(node).is_some_and(is_special));

            // STEP 4.8: "If there is no furthest block, then the UA must first
            //            pop all the nodes from the bottom of the stack of open
            //            elements, from the current node up to and including
            //            formatting element, then remove formatting element
            //            from the list of active formatting elements, and
            //            finally return."
            let Some(furthest_block) = furthest_block else {
                self.stack.truncate(formatting_index);
                let _ = self.formatting.remove(formatting_element);
                return;
            };

            // STEP 4.9: "Let common ancestor be the element immediately above
            //            formatting element in the stack of open elements."
            let common_ancestor = formatting_index
                .checked_sub(1)
                .and_then(|index| self.stack.get(index))
                .unwrap_or(NodeId::ROOT);

            // STEP 4.10: "Let a bookmark note the position of formatting
            //             element in the list of active formatting elements
            //             relative to the elements on either side of it in the
            //             list."
            let mut bookmark = self.formatting.position(formatting_element).unwrap_or(0);

            // STEP 4.11: "Let node and last node be furthest block."
            let mut node_index = self.stack.position(furthest_block).unwrap_or(formatting_index);
            let mut last_node = furthest_block;

            // STEP 4.12: "Let inner loop counter be 0."
            // STEP 4.13: "While true:"
            let mut inner_loop_counter = 0;
            loop {
                // STEP 4.13.1: "Increment inner loop counter by 1."
                inner_loop_counter += 1;

                // STEP 4.13.2: "Let node be the element immediately above node
                //               in the stack of open elements, or if node is no
                //               longer in the stack of open elements (e.g.
                //               because it got removed by this algorithm), the
                //               element that was immediately above node in the
                //               stack of open elements before node was removed."
                let Some(node) = node_index
                    .checked_sub(1)
                    .and_then(|index| self.stack.get(index))
                else {
                    break;
                };
                node_index -= 1;

                // STEP 4.13.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 4.13.4: "If inner loop counter is greater than 3 and node
                //               is in the list of active formatting elements,
                //               then remove node from the list of active
                //               formatting elements."
                if inner_loop_counter > INNER_LOOP_LIMIT
                    && let Some(removed) = self.formatting.remove(node)
                    && removed < bookmark
                {
                    bookmark -= 1;
                }

                // STEP 4.13.5: "If node is not in the list of active formatting
                //               elements, then remove node from the stack of
                //               open elements and continue."
                let Some(token) = self.formatting.token_for(node).cloned() else {
                    let _ = self.stack.remove_at(node_index);
                    continue;
                };

                // STEP 4.13.6: "Create an element for the token for which the
                //               element node was created, in the HTML
                //               namespace, with common ancestor as the intended
                //               parent; replace the entry for node in the list
                //               of active formatting elements with an entry for
                //               the new element, replace the entry for node in
                //               the stack of open elements with an entry for
                //               the new element, and let node be the new
                //               element."
                let Some(new_element) = self.create_from_token(&token) else {
                    break;
                };
                let _ = self.formatting.replace(node, new_element);
                let _ = self.stack.replace_element(node, new_element);
                let node = new_element;

                // STEP 4.13.7: "If last node is furthest block, then move the
                //               aforementioned bookmark to be immediately after
                //               the new node in the list of active formatting
                //               elements."
                if last_node == furthest_block
                    && let Some(position) = self.formatting.position(node)
                {
                    bookmark = position + 1;
                }

                // STEP 4.13.8: "Append last node to node."
                self.tree.append_child(node, last_node);

                // STEP 4.13.9: "Set last node to node."
                last_node = node;
            }

            // STEP 4.14: "Insert whatever last node ended up being in the
            //             previous step at the appropriate place for inserting
            //             a node, but using common ancestor as the override
            //             target."
            self.tree.detach(last_node);
            let point = self.appropriate_place(Some(common_ancestor));
            self.insert_node(point, last_node);

            // STEP 4.15: "Create an element for the token for which formatting
            //             element was created, in the HTML namespace, with
            //             furthest block as the intended parent."
            let Some(token) = self.formatting.token_for(formatting_element).cloned() else {
                return;
            };
            let Some(new_element) = self.create_from_token(&token) else {
                return;
            };

            // STEP 4.16: "Take all of the child nodes of furthest block and
            //             append them to the element created in the last step."
            self.tree.move_children(furthest_block, new_element);

            // STEP 4.17: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // STEP 4.18: "Remove formatting element from the list of active
            //             formatting elements, and insert the new element into
            //             the list of active formatting elements at the
            //             position of the aforementioned bookmark."
            if let Some(removed) = self.formatting.remove(formatting_element)
                && removed < bookmark
            {
                bookmark -= 1;
            }
            self.formatting.insert_at(bookmark, new_element, token);

            // STEP 4.19: "Remove formatting element from the stack of open
            //             elements, and insert the new element into the stack
            //             of open elements immediately below the position of
            //             furthest block in that stack."
            let _ = self.stack.remove_element(formatting_element);
            let below_furthest = self
                .stack
                .position(furthest_block)
                .map_or(self.stack.len(), |index| index + 1);
            self.stack.insert_at(below_furthest, new_element);
        }
    }

    /// "Create an element for the token for which the element ... was
    /// created, in the HTML namespace"
    fn create_from_token(&mut self, token: &Token) -> Option<NodeId> {
        match token {
            Token::StartTag {
                name, attributes, ..
            } => Some(self.create_element(name, attributes, Namespace::Html)),
            _ => None,
        }
    }
}
