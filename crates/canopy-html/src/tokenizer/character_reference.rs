//! Character reference states for the HTML tokenizer.
//!
//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! Named references are matched one character at a time so a chunk boundary
//! can fall inside `&amp;`. The longest match seen so far is remembered in
//! `named_match`; characters consumed past it are flushed as ordinary text.

use std::mem;

use super::core::{HTMLTokenizer, TokenizerState};
use super::named_character_references::{any_entity_has_prefix, lookup_entity};
use crate::error::ErrorKind;

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is one of the numbers in the first column of the following
/// table, then find the row with that number in the first column, and set the
/// character reference code to the number in the second column."
const C1_REPLACEMENTS: [(u32, u32); 27] = [
    (0x80, 0x20AC),
    (0x82, 0x201A),
    (0x83, 0x0192),
    (0x84, 0x201E),
    (0x85, 0x2026),
    (0x86, 0x2020),
    (0x87, 0x2021),
    (0x88, 0x02C6),
    (0x89, 0x2030),
    (0x8A, 0x0160),
    (0x8B, 0x2039),
    (0x8C, 0x0152),
    (0x8E, 0x017D),
    (0x91, 0x2018),
    (0x92, 0x2019),
    (0x93, 0x201C),
    (0x94, 0x201D),
    (0x95, 0x2022),
    (0x96, 0x2013),
    (0x97, 0x2014),
    (0x98, 0x02DC),
    (0x99, 0x2122),
    (0x9A, 0x0161),
    (0x9B, 0x203A),
    (0x9C, 0x0153),
    (0x9E, 0x017E),
    (0x9F, 0x0178),
];

/// Codes above this are clamped while accumulating digits; anything past
/// U+10FFFF is an error either way.
const CODE_CEILING: u32 = 0x11_0000;

/// [Noncharacter](https://infra.spec.whatwg.org/#noncharacter):
/// "a code point that is in the range U+FDD0 to U+FDEF, inclusive, or
/// U+FFFE, U+FFFF, U+1FFFE, U+1FFFF, ... U+10FFFE, or U+10FFFF."
pub(super) const fn is_noncharacter(code: u32) -> bool {
    matches!(code, 0xFDD0..=0xFDEF) || (code <= 0x10_FFFF && (code & 0xFFFE) == 0xFFFE)
}

/// [Control](https://infra.spec.whatwg.org/#control): "a C0 control or a code
/// point in the range U+007F DELETE to U+009F APPLICATION PROGRAM COMMAND".
const fn is_control(code: u32) -> bool {
    code <= 0x1F || matches!(code, 0x7F..=0x9F)
}

impl HTMLTokenizer {
    /// "consumed as part of an attribute"
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            TokenizerState::AttributeValueDoubleQuoted
                | TokenizerState::AttributeValueSingleQuoted
                | TokenizerState::AttributeValueUnquoted
        )
    }

    /// "Flush code points consumed as a character reference"
    ///
    /// "If the character reference was consumed as part of an attribute, then
    /// append each character to the current attribute's value. Otherwise,
    /// emit each character as a character token."
    fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = mem::take(&mut self.temporary_buffer);
        self.flush_str(&buffer);
    }

    fn flush_str(&mut self, text: &str) {
        if self.is_consumed_as_part_of_attribute() {
            self.current_tag.push_attribute_value_str(text);
        } else {
            for c in text.chars() {
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self, c: Option<char>) {
        // "Set the temporary buffer to the empty string. Append a U+0026
        // AMPERSAND (&) character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');
        self.named_match = None;

        match c {
            // "ASCII alphanumeric"
            // "Reconsume in the named character reference state."
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            // "U+0023 NUMBER SIGN (#)"
            // "Append the current input character to the temporary buffer.
            // Switch to the numeric character reference state."
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            // "Anything else"
            // "Flush code points consumed as a character reference.
            // Reconsume in the return state."
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                self.reconsume_in(self.return_state);
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// "Consume the maximum number of characters possible, where the consumed
    /// characters are one of the identifiers in the first column of the named
    /// character references table. Append each character to the temporary
    /// buffer when it's consumed."
    ///
    /// Runs once per input character. The temporary buffer keeps growing while
    /// it is still a prefix of some entity name; the first character that
    /// breaks the prefix decides the outcome and is reconsumed afterwards.
    pub(super) fn handle_named_character_reference_state(&mut self, c: Option<char>) {
        if let Some(ch) = c.filter(|ch| ch.is_ascii_alphanumeric() || *ch == ';') {
            let mut candidate = String::with_capacity(self.temporary_buffer.len());
            candidate.push_str(&self.temporary_buffer[1..]);
            candidate.push(ch);
            if any_entity_has_prefix(&candidate) {
                self.temporary_buffer.push(ch);
                if let Some(replacement) = lookup_entity(&candidate) {
                    self.named_match = Some((self.temporary_buffer.len(), replacement));
                }
                // No name continues past a semicolon.
                if ch == ';' {
                    self.finish_named_character_reference(None);
                }
                return;
            }
        }
        self.finish_named_character_reference(c);
        // The character that ended the scan belongs to the next state.
        self.reconsume = true;
    }

    /// Resolve the named reference once the longest candidate is known.
    /// `next` is the character that ended the scan, if it was not consumed.
    fn finish_named_character_reference(&mut self, next: Option<char>) {
        let Some((match_len, replacement)) = self.named_match.take() else {
            // "Otherwise: Flush code points consumed as a character reference.
            // Switch to the ambiguous ampersand state."
            self.flush_code_points_consumed_as_character_reference();
            self.switch_to(TokenizerState::AmbiguousAmpersand);
            return;
        };

        let buffer = mem::take(&mut self.temporary_buffer);
        let (matched, rest) = buffer.split_at(match_len);
        let last_char_is_semicolon = matched.ends_with(';');
        // "the next input character" after the match: either the first
        // character consumed past it, or the one that ended the scan.
        let next_input_character = rest.chars().next().or(next);

        // "If the character reference was consumed as part of an attribute, and
        // the last character matched is not a U+003B SEMICOLON character (;), and
        // the next input character is either a U+003D EQUALS SIGN character (=) or
        // an ASCII alphanumeric, then, for historical reasons, flush code points
        // consumed as a character reference and switch to the return state."
        if self.is_consumed_as_part_of_attribute()
            && !last_char_is_semicolon
            && next_input_character.is_some_and(|ch| ch == '=' || ch.is_ascii_alphanumeric())
        {
            self.flush_str(&buffer);
        } else {
            // "If the last character matched is not a U+003B SEMICOLON character
            // (;), then this is a missing-semicolon-after-character-reference
            // parse error."
            if !last_char_is_semicolon {
                self.parse_error(ErrorKind::MissingSemicolonAfterCharacterReference);
            }
            // "Set the temporary buffer to the empty string. Append one or two
            // characters corresponding to the character reference name (as given
            // by the second column of the named character references table) to
            // the temporary buffer. Flush code points consumed as a character
            // reference."
            self.flush_str(replacement);
            // Characters consumed past the match are ordinary text again.
            self.flush_str(rest);
        }
        // "Switch to the return state."
        self.switch_to(self.return_state);
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self, c: Option<char>) {
        match c {
            // "ASCII alphanumeric"
            // "If the character reference was consumed as part of an attribute, then
            // append the current input character to the current attribute's value.
            // Otherwise, emit the current input character as a character token."
            Some(c) if c.is_ascii_alphanumeric() => {
                if self.is_consumed_as_part_of_attribute() {
                    self.current_tag.push_attribute_value(c);
                } else {
                    self.emit_character_token(c);
                }
            }
            // "U+003B SEMICOLON (;)"
            // "This is an unknown-named-character-reference parse error.
            // Reconsume in the return state."
            Some(';') => {
                self.parse_error(ErrorKind::UnknownNamedCharacterReference);
                self.reconsume_in(self.return_state);
            }
            // "Anything else"
            // "Reconsume in the return state."
            _ => self.reconsume_in(self.return_state),
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self, c: Option<char>) {
        // "Set the character reference code to zero (0)."
        self.character_reference_code = 0;
        match c {
            // "U+0078 LATIN SMALL LETTER X" "U+0058 LATIN CAPITAL LETTER X"
            // "Append the current input character to the temporary buffer. Switch to
            // the hexadecimal character reference start state."
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            // "Anything else"
            // "Reconsume in the decimal character reference start state."
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_numeric_character_reference_start_state(&mut self, c: Option<char>, radix: u32) {
        match c {
            // "ASCII hex digit" / "ASCII digit"
            // "Reconsume in the hexadecimal/decimal character reference state."
            Some(c) if c.is_digit(radix) => self.reconsume_in(if radix == 16 {
                TokenizerState::HexadecimalCharacterReference
            } else {
                TokenizerState::DecimalCharacterReference
            }),
            // "Anything else"
            // "This is an absence-of-digits-in-numeric-character-reference parse error.
            // Flush code points consumed as a character reference. Reconsume in the
            // return state."
            _ => {
                self.parse_error(ErrorKind::AbsenceOfDigitsInNumericCharacterReference);
                self.flush_code_points_consumed_as_character_reference();
                self.reconsume_in(self.return_state);
            }
        }
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_numeric_digits_state(&mut self, c: Option<char>, radix: u32) {
        match c.and_then(|c| c.to_digit(radix)) {
            // "Multiply the character reference code by 16 (or 10). Add a numeric
            // version of the current input character to the character reference code."
            Some(digit) => {
                self.character_reference_code = self
                    .character_reference_code
                    .saturating_mul(radix)
                    .saturating_add(digit)
                    .min(CODE_CEILING);
            }
            None if c == Some(';') => {
                self.switch_to(TokenizerState::NumericCharacterReferenceEnd);
            }
            // "Anything else"
            // "This is a missing-semicolon-after-character-reference parse error.
            // Reconsume in the numeric character reference end state."
            None => {
                self.parse_error(ErrorKind::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// "Check the character reference code". Consumes nothing; a pending
    /// reconsume carries over into the return state.
    pub(super) fn handle_numeric_character_reference_end_state(&mut self) {
        let code = self.character_reference_code;
        let resolved = if code == 0 {
            // "If the number is 0x00, then this is a null-character-reference parse
            // error. Set the character reference code to 0xFFFD."
            self.parse_error(ErrorKind::NullCharacterReference);
            0xFFFD
        } else if code > 0x10_FFFF {
            // "If the number is greater than 0x10FFFF, then this is a
            // character-reference-outside-unicode-range parse error. Set the
            // character reference code to 0xFFFD."
            self.parse_error(ErrorKind::CharacterReferenceOutsideUnicodeRange);
            0xFFFD
        } else if matches!(code, 0xD800..=0xDFFF) {
            // "If the number is a surrogate, then this is a
            // surrogate-character-reference parse error. Set the character
            // reference code to 0xFFFD."
            self.parse_error(ErrorKind::SurrogateCharacterReference);
            0xFFFD
        } else if is_noncharacter(code) {
            // "If the number is a noncharacter, then this is a
            // noncharacter-character-reference parse error."
            self.parse_error(ErrorKind::NoncharacterCharacterReference);
            code
        } else if code == 0x0D || (is_control(code) && !matches!(code, 0x09 | 0x0A | 0x0C | 0x20)) {
            // "If the number is 0x0D, or a control that's not ASCII whitespace,
            // then this is a control-character-reference parse error."
            self.parse_error(ErrorKind::ControlCharacterReference);
            C1_REPLACEMENTS
                .iter()
                .find(|(from, _)| *from == code)
                .map_or(code, |(_, to)| *to)
        } else {
            code
        };

        // "Set the temporary buffer to the empty string. Append a code point equal
        // to the character reference code to the temporary buffer. Flush code
        // points consumed as a character reference. Switch to the return state."
        self.temporary_buffer.clear();
        self.temporary_buffer
            .push(char::from_u32(resolved).unwrap_or('\u{FFFD}'));
        self.flush_code_points_consumed_as_character_reference();
        self.state = self.return_state;
    }
}
