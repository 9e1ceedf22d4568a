use std::collections::VecDeque;

use log::trace;
use serde::Serialize;
use strum_macros::Display;

use super::input::{InputStream, MatchResult, Next};
use super::token::{TagBuilder, TagKind, Token};
use crate::error::{ErrorKind, ParseIssue, Position};

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in § 13.2.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    #[default]
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    RCDATA,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RAWTEXT,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    PLAINTEXT,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    RCDATALessThanSign,
    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    RCDATAEndTagOpen,
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    RCDATAEndTagName,
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    RAWTEXTLessThanSign,
    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    RAWTEXTEndTagOpen,
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    RAWTEXTEndTagName,
    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    ScriptDataLessThanSign,
    /// [§ 13.2.5.16 Script data end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-open-state)
    ScriptDataEndTagOpen,
    /// [§ 13.2.5.17 Script data end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-name-state)
    ScriptDataEndTagName,
    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    ScriptDataEscapeStart,
    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    ScriptDataEscapeStartDash,
    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    ScriptDataEscaped,
    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    ScriptDataEscapedDash,
    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    ScriptDataEscapedDashDash,
    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    ScriptDataEscapedLessThanSign,
    /// [§ 13.2.5.24 Script data escaped end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-open-state)
    ScriptDataEscapedEndTagOpen,
    /// [§ 13.2.5.25 Script data escaped end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-name-state)
    ScriptDataEscapedEndTagName,
    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    ScriptDataDoubleEscapeStart,
    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    ScriptDataDoubleEscaped,
    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    ScriptDataDoubleEscapedDash,
    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    ScriptDataDoubleEscapedDashDash,
    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    ScriptDataDoubleEscapedLessThanSign,
    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    ScriptDataDoubleEscapeEnd,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    CommentLessThanSign,
    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    CommentLessThanSignBang,
    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    CommentLessThanSignBangDash,
    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    CommentLessThanSignBangDashDash,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    CommentEndBang,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    DOCTYPE,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDOCTYPEName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DOCTYPEName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    AfterDOCTYPEName,
    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    AfterDOCTYPEPublicKeyword,
    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    BeforeDOCTYPEPublicIdentifier,
    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    DOCTYPEPublicIdentifierDoubleQuoted,
    /// [§ 13.2.5.60 DOCTYPE public identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    DOCTYPEPublicIdentifierSingleQuoted,
    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    AfterDOCTYPEPublicIdentifier,
    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    BetweenDOCTYPEPublicAndSystemIdentifiers,
    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    AfterDOCTYPESystemKeyword,
    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    BeforeDOCTYPESystemIdentifier,
    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    DOCTYPESystemIdentifierDoubleQuoted,
    /// [§ 13.2.5.66 DOCTYPE system identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    DOCTYPESystemIdentifierSingleQuoted,
    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    AfterDOCTYPESystemIdentifier,
    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    BogusDOCTYPE,
    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    CDATASection,
    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    CDATASectionBracket,
    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    CDATASectionEnd,
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    CharacterReference,
    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    NamedCharacterReference,
    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    AmbiguousAmpersand,
    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    NumericCharacterReference,
    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    HexadecimalCharacterReferenceStart,
    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    DecimalCharacterReferenceStart,
    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    HexadecimalCharacterReference,
    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    DecimalCharacterReference,
    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    NumericCharacterReferenceEnd,
}

/// Starting conditions for a tokenizer.
#[derive(Debug, Clone, Default)]
pub struct TokenizerConfig {
    /// State the tokenizer starts in. Fragment parsing picks this from the
    /// context element (RCDATA for `title`, RAWTEXT for `style`, ...).
    pub initial_state: TokenizerState,
    /// Name treated as the last emitted start tag, which decides whether an
    /// end tag is "appropriate" in the RCDATA, RAWTEXT and script data states.
    pub last_start_tag: Option<String>,
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenizerStats {
    /// Tokens handed out by [`HTMLTokenizer::next_token`].
    pub tokens: usize,
    /// Input characters consumed (after newline normalization).
    pub characters: usize,
    /// Times the tokenizer ran out of buffered input before the stream ended.
    pub suspensions: usize,
    /// Parse errors recorded.
    pub errors: usize,
}

/// The DOCTYPE token under construction.
#[derive(Debug, Default)]
pub(super) struct DoctypeBuilder {
    pub(super) name: Option<String>,
    pub(super) public_identifier: Option<String>,
    pub(super) system_identifier: Option<String>,
    pub(super) force_quirks: bool,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// Each call to [`next_token`](Self::next_token) runs the state machine one
/// input character at a time until a token is ready or the buffered input is
/// exhausted. Everything a state needs to resume is kept on the struct.
#[derive(Debug)]
pub struct HTMLTokenizer {
    pub(super) state: TokenizerState,
    /// "the return state", used by the character reference states.
    pub(super) return_state: TokenizerState,
    pub(super) input: InputStream,
    pub(super) current_input_character: Option<char>,
    /// When true, the next step will not consume a new character.
    /// "Reconsume in the X state" sets this flag.
    pub(super) reconsume: bool,

    pub(super) current_tag: TagBuilder,
    pub(super) current_comment: String,
    pub(super) current_doctype: DoctypeBuilder,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
    /// "The last start tag token emitted is used as part of the tree construction stage
    /// and in the RCDATA, RAWTEXT, and script data states."
    pub(super) last_start_tag_name: Option<String>,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    pub(super) temporary_buffer: String,

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    /// "the character reference code"
    pub(super) character_reference_code: u32,

    /// Longest named reference matched so far: length of the matched prefix
    /// of the temporary buffer and its replacement text.
    pub(super) named_match: Option<(usize, &'static str)>,

    /// Set by the tree builder while the adjusted current node is a foreign
    /// element, which is the only place `<![CDATA[` opens a CDATA section.
    pub(super) cdata_allowed: bool,

    pub(super) queue: VecDeque<Token>,
    pub(super) errors: Vec<ParseIssue>,
    pub(super) stats: TokenizerStats,
    pub(super) finished: bool,
}

impl HTMLTokenizer {
    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
    /// "The tokenizer state machine consists of the states defined in the
    /// following subsections. The initial state is the data state."
    ///
    /// The initial state can be overridden for fragment parsing.
    #[must_use]
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            state: config.initial_state,
            return_state: TokenizerState::Data,
            input: InputStream::new(),
            current_input_character: None,
            reconsume: false,
            current_tag: TagBuilder::new(TagKind::Start),
            current_comment: String::new(),
            current_doctype: DoctypeBuilder::default(),
            last_start_tag_name: config.last_start_tag,
            temporary_buffer: String::new(),
            character_reference_code: 0,
            named_match: None,
            cdata_allowed: false,
            queue: VecDeque::new(),
            errors: Vec::new(),
            stats: TokenizerStats::default(),
            finished: false,
        }
    }

    /// Append a chunk of decoded input. Ignored once [`end`](Self::end) was called.
    pub fn feed(&mut self, chunk: &str) {
        self.input.push_str(chunk);
    }

    /// Mark the end of the input stream. The next time the buffered input
    /// runs out, the tokenizer emits the end-of-file token.
    pub fn end(&mut self) {
        self.input.close();
    }

    /// Produce the next token.
    ///
    /// Returns `None` when the buffered input is exhausted and more is needed,
    /// or after the end-of-file token was handed out.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                self.stats.tokens += 1;
                return Some(token);
            }
            if self.finished {
                return None;
            }
            if !self.step() {
                self.stats.suspensions += 1;
                trace!("tokenizer suspended in {} state", self.state);
                return None;
            }
        }
    }

    /// Switch the tokenizer state from outside, as the tree builder does
    /// after inserting `title`, `textarea`, `style`, `script`, `plaintext`...
    pub fn set_state(&mut self, state: TokenizerState) {
        trace!("tokenizer state {} -> {state}", self.state);
        self.state = state;
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "if there is an adjusted current node and it is not an element in the
    /// HTML namespace"
    pub const fn set_cdata_allowed(&mut self, allowed: bool) {
        self.cdata_allowed = allowed;
    }

    /// Take the parse errors recorded since the last call.
    pub fn take_errors(&mut self) -> Vec<ParseIssue> {
        std::mem::take(&mut self.errors)
    }

    /// Diagnostic counters.
    #[must_use]
    pub const fn stats(&self) -> TokenizerStats {
        self.stats
    }

    /// Position of the most recently consumed input character.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.input.position()
    }

    /// Whether the end-of-file token has been produced.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Run one state. Returns `false` if the state needs input that has not
    /// arrived yet.
    fn step(&mut self) -> bool {
        // States that look ahead before (or instead of) consuming.
        match self.state {
            TokenizerState::MarkupDeclarationOpen => return self.handle_markup_declaration_open_state(),
            TokenizerState::NumericCharacterReferenceEnd => {
                self.handle_numeric_character_reference_end_state();
                return true;
            }
            TokenizerState::AfterDOCTYPEName if !self.reconsume => {
                if let Some(progress) = self.match_doctype_keyword() {
                    return progress;
                }
            }
            _ => {}
        }

        // "Consume the next input character"
        if self.reconsume {
            self.reconsume = false;
        } else {
            match self.input.next_char() {
                Next::Char(c) => {
                    self.stats.characters += 1;
                    self.check_input_character(c);
                    self.current_input_character = Some(c);
                }
                Next::Eof => self.current_input_character = None,
                Next::NeedMoreInput => return false,
            }
        }

        let c = self.current_input_character;
        match self.state {
            TokenizerState::Data => self.handle_data_state(c),
            TokenizerState::RCDATA => self.handle_rcdata_state(c),
            TokenizerState::RAWTEXT => self.handle_rawtext_state(c),
            TokenizerState::ScriptData => self.handle_script_data_state(c),
            TokenizerState::PLAINTEXT => self.handle_plaintext_state(c),
            TokenizerState::TagOpen => self.handle_tag_open_state(c),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(c),
            TokenizerState::TagName => self.handle_tag_name_state(c),
            TokenizerState::RCDATALessThanSign => {
                self.handle_text_less_than_sign_state(c, TokenizerState::RCDATAEndTagOpen, TokenizerState::RCDATA);
            }
            TokenizerState::RCDATAEndTagOpen => {
                self.handle_text_end_tag_open_state(c, TokenizerState::RCDATAEndTagName, TokenizerState::RCDATA);
            }
            TokenizerState::RCDATAEndTagName => self.handle_text_end_tag_name_state(c, TokenizerState::RCDATA),
            TokenizerState::RAWTEXTLessThanSign => {
                self.handle_text_less_than_sign_state(c, TokenizerState::RAWTEXTEndTagOpen, TokenizerState::RAWTEXT);
            }
            TokenizerState::RAWTEXTEndTagOpen => {
                self.handle_text_end_tag_open_state(c, TokenizerState::RAWTEXTEndTagName, TokenizerState::RAWTEXT);
            }
            TokenizerState::RAWTEXTEndTagName => self.handle_text_end_tag_name_state(c, TokenizerState::RAWTEXT),
            TokenizerState::ScriptDataLessThanSign => self.handle_script_data_less_than_sign_state(c),
            TokenizerState::ScriptDataEndTagOpen => {
                self.handle_text_end_tag_open_state(c, TokenizerState::ScriptDataEndTagName, TokenizerState::ScriptData);
            }
            TokenizerState::ScriptDataEndTagName => self.handle_text_end_tag_name_state(c, TokenizerState::ScriptData),
            TokenizerState::ScriptDataEscapeStart => {
                self.handle_script_data_escape_start_state(c, TokenizerState::ScriptDataEscapeStartDash);
            }
            TokenizerState::ScriptDataEscapeStartDash => {
                self.handle_script_data_escape_start_state(c, TokenizerState::ScriptDataEscapedDashDash);
            }
            TokenizerState::ScriptDataEscaped => self.handle_script_data_escaped_state(c),
            TokenizerState::ScriptDataEscapedDash => self.handle_script_data_escaped_dash_state(c),
            TokenizerState::ScriptDataEscapedDashDash => self.handle_script_data_escaped_dash_dash_state(c),
            TokenizerState::ScriptDataEscapedLessThanSign => self.handle_script_data_escaped_less_than_sign_state(c),
            TokenizerState::ScriptDataEscapedEndTagOpen => self.handle_text_end_tag_open_state(
                c,
                TokenizerState::ScriptDataEscapedEndTagName,
                TokenizerState::ScriptDataEscaped,
            ),
            TokenizerState::ScriptDataEscapedEndTagName => {
                self.handle_text_end_tag_name_state(c, TokenizerState::ScriptDataEscaped);
            }
            TokenizerState::ScriptDataDoubleEscapeStart => self.handle_script_data_double_escape_boundary_state(
                c,
                TokenizerState::ScriptDataDoubleEscaped,
                TokenizerState::ScriptDataEscaped,
            ),
            TokenizerState::ScriptDataDoubleEscaped => self.handle_script_data_double_escaped_state(c),
            TokenizerState::ScriptDataDoubleEscapedDash => self.handle_script_data_double_escaped_dash_state(c),
            TokenizerState::ScriptDataDoubleEscapedDashDash => {
                self.handle_script_data_double_escaped_dash_dash_state(c);
            }
            TokenizerState::ScriptDataDoubleEscapedLessThanSign => {
                self.handle_script_data_double_escaped_less_than_sign_state(c);
            }
            TokenizerState::ScriptDataDoubleEscapeEnd => self.handle_script_data_double_escape_boundary_state(
                c,
                TokenizerState::ScriptDataEscaped,
                TokenizerState::ScriptDataDoubleEscaped,
            ),
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(c),
            TokenizerState::AttributeName => self.handle_attribute_name_state(c),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(c),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(c),
            TokenizerState::AttributeValueDoubleQuoted => self.handle_attribute_value_quoted_state(c, '"'),
            TokenizerState::AttributeValueSingleQuoted => self.handle_attribute_value_quoted_state(c, '\''),
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(c),
            TokenizerState::AfterAttributeValueQuoted => self.handle_after_attribute_value_quoted_state(c),
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(c),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(c),
            TokenizerState::CommentStart => self.handle_comment_start_state(c),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(c),
            TokenizerState::Comment => self.handle_comment_state(c),
            TokenizerState::CommentLessThanSign => self.handle_comment_less_than_sign_state(c),
            TokenizerState::CommentLessThanSignBang => self.handle_comment_less_than_sign_bang_state(c),
            TokenizerState::CommentLessThanSignBangDash => self.handle_comment_less_than_sign_bang_dash_state(c),
            TokenizerState::CommentLessThanSignBangDashDash => {
                self.handle_comment_less_than_sign_bang_dash_dash_state(c);
            }
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(c),
            TokenizerState::CommentEnd => self.handle_comment_end_state(c),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(c),
            TokenizerState::DOCTYPE => self.handle_doctype_state(c),
            TokenizerState::BeforeDOCTYPEName => self.handle_before_doctype_name_state(c),
            TokenizerState::DOCTYPEName => self.handle_doctype_name_state(c),
            TokenizerState::AfterDOCTYPEName => self.handle_after_doctype_name_state(c),
            TokenizerState::AfterDOCTYPEPublicKeyword => self.handle_after_doctype_keyword_state(
                c,
                TokenizerState::BeforeDOCTYPEPublicIdentifier,
                DoctypeId::Public,
            ),
            TokenizerState::BeforeDOCTYPEPublicIdentifier => {
                self.handle_before_doctype_identifier_state(c, DoctypeId::Public);
            }
            TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(c, '"', DoctypeId::Public);
            }
            TokenizerState::DOCTYPEPublicIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(c, '\'', DoctypeId::Public);
            }
            TokenizerState::AfterDOCTYPEPublicIdentifier => self.handle_after_doctype_public_identifier_state(c),
            TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers => {
                self.handle_between_doctype_public_and_system_identifiers_state(c);
            }
            TokenizerState::AfterDOCTYPESystemKeyword => self.handle_after_doctype_keyword_state(
                c,
                TokenizerState::BeforeDOCTYPESystemIdentifier,
                DoctypeId::System,
            ),
            TokenizerState::BeforeDOCTYPESystemIdentifier => {
                self.handle_before_doctype_identifier_state(c, DoctypeId::System);
            }
            TokenizerState::DOCTYPESystemIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(c, '"', DoctypeId::System);
            }
            TokenizerState::DOCTYPESystemIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(c, '\'', DoctypeId::System);
            }
            TokenizerState::AfterDOCTYPESystemIdentifier => self.handle_after_doctype_system_identifier_state(c),
            TokenizerState::BogusDOCTYPE => self.handle_bogus_doctype_state(c),
            TokenizerState::CDATASection => self.handle_cdata_section_state(c),
            TokenizerState::CDATASectionBracket => self.handle_cdata_section_bracket_state(c),
            TokenizerState::CDATASectionEnd => self.handle_cdata_section_end_state(c),
            TokenizerState::CharacterReference => self.handle_character_reference_state(c),
            TokenizerState::NamedCharacterReference => self.handle_named_character_reference_state(c),
            TokenizerState::AmbiguousAmpersand => self.handle_ambiguous_ampersand_state(c),
            TokenizerState::NumericCharacterReference => self.handle_numeric_character_reference_state(c),
            TokenizerState::HexadecimalCharacterReferenceStart => {
                self.handle_numeric_character_reference_start_state(c, 16);
            }
            TokenizerState::DecimalCharacterReferenceStart => {
                self.handle_numeric_character_reference_start_state(c, 10);
            }
            TokenizerState::HexadecimalCharacterReference => self.handle_numeric_digits_state(c, 16),
            TokenizerState::DecimalCharacterReference => self.handle_numeric_digits_state(c, 10),
            // Handled before consuming.
            TokenizerState::MarkupDeclarationOpen | TokenizerState::NumericCharacterReferenceEnd => {}
        }
        true
    }

    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Any occurrences of noncharacters in the input stream are
    /// noncharacter-in-input-stream parse errors and any occurrences of
    /// controls other than ASCII whitespace and U+0000 NULL characters are
    /// control-character-in-input-stream parse errors."
    fn check_input_character(&mut self, c: char) {
        if super::character_reference::is_noncharacter(u32::from(c)) {
            self.parse_error(ErrorKind::NoncharacterInInputStream);
        } else if c != '\0' && c.is_control() && !Self::is_whitespace_char(c) {
            self.parse_error(ErrorKind::ControlCharacterInInputStream);
        }
    }

    // =========================================================================
    // Text states
    // =========================================================================

    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    fn handle_data_state(&mut self, c: Option<char>) {
        match c {
            // "U+0026 AMPERSAND (&) - Set the return state to the data state.
            // Switch to the character reference state."
            Some('&') => {
                self.return_state = TokenizerState::Data;
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "U+0000 NULL - This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.emit_character_token('\0');
            }
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof_token(),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    fn handle_rcdata_state(&mut self, c: Option<char>) {
        match c {
            // "U+0026 AMPERSAND (&)"
            // "Set the return state to the RCDATA state. Switch to the character reference state."
            Some('&') => {
                self.return_state = TokenizerState::RCDATA;
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "U+003C LESS-THAN SIGN (<)"
            // "Switch to the RCDATA less-than sign state."
            Some('<') => self.switch_to(TokenizerState::RCDATALessThanSign),
            _ => self.handle_plain_text_character(c),
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    fn handle_rawtext_state(&mut self, c: Option<char>) {
        match c {
            Some('<') => self.switch_to(TokenizerState::RAWTEXTLessThanSign),
            _ => self.handle_plain_text_character(c),
        }
    }

    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    fn handle_script_data_state(&mut self, c: Option<char>) {
        match c {
            Some('<') => self.switch_to(TokenizerState::ScriptDataLessThanSign),
            _ => self.handle_plain_text_character(c),
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    fn handle_plaintext_state(&mut self, c: Option<char>) {
        self.handle_plain_text_character(c);
    }

    /// The entries the RCDATA, RAWTEXT, script data and PLAINTEXT states share:
    ///
    /// "U+0000 NULL: This is an unexpected-null-character parse error. Emit a
    /// U+FFFD REPLACEMENT CHARACTER character token."
    /// "EOF: Emit an end-of-file token."
    /// "Anything else: Emit the current input character as a character token."
    fn handle_plain_text_character(&mut self, c: Option<char>) {
        match c {
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    fn handle_text_less_than_sign_state(&mut self, c: Option<char>, end_tag_open: TokenizerState, text: TokenizerState) {
        match c {
            // "U+002F SOLIDUS (/)"
            // "Set the temporary buffer to the empty string. Switch to the ... end tag open state."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(end_tag_open);
            }
            // "Anything else"
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the ... state."
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(text);
            }
        }
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    /// and its RAWTEXT, script data and script data escaped counterparts.
    fn handle_text_end_tag_open_state(&mut self, c: Option<char>, end_tag_name: TokenizerState, text: TokenizerState) {
        match c {
            // "ASCII alpha"
            // "Create a new end tag token, set its tag name to the empty string.
            // Reconsume in the ... end tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = TagBuilder::new(TagKind::End);
                self.reconsume_in(end_tag_name);
            }
            // "Anything else"
            // "Emit a U+003C LESS-THAN SIGN character token and a U+002F SOLIDUS
            // character token. Reconsume in the ... state."
            _ => {
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.reconsume_in(text);
            }
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    /// and its RAWTEXT, script data and script data escaped counterparts.
    fn handle_text_end_tag_name_state(&mut self, c: Option<char>, text: TokenizerState) {
        match c {
            // "U+0009 CHARACTER TABULATION (tab)" "U+000A LINE FEED (LF)"
            // "U+000C FORM FEED (FF)" "U+0020 SPACE"
            // "If the current end tag token is an appropriate end tag token, then switch to the
            // before attribute name state. Otherwise, treat it as per the "anything else" entry below."
            Some(c) if Self::is_whitespace_char(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            // "U+002F SOLIDUS (/)"
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            // "ASCII upper alpha" / "ASCII lower alpha"
            // "Append the lowercase version of the current input character to the current
            // tag token's tag name. Append the current input character to the temporary buffer."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag.name.push(c.to_ascii_lowercase());
                self.temporary_buffer.push(c);
            }
            // "Anything else"
            _ => self.emit_end_tag_name_anything_else(text),
        }
    }

    // =========================================================================
    // Script data escapes
    // =========================================================================

    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    fn handle_script_data_less_than_sign_state(&mut self, c: Option<char>) {
        match c {
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEndTagOpen);
            }
            // "U+0021 EXCLAMATION MARK (!)"
            // "Switch to the script data escape start state. Emit a U+003C LESS-THAN SIGN
            // character token and a U+0021 EXCLAMATION MARK character token."
            Some('!') => {
                self.switch_to(TokenizerState::ScriptDataEscapeStart);
                self.emit_character_token('<');
                self.emit_character_token('!');
            }
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    fn handle_script_data_escape_start_state(&mut self, c: Option<char>, on_dash: TokenizerState) {
        match c {
            // "U+002D HYPHEN-MINUS (-)"
            // "Switch to the next state. Emit a U+002D HYPHEN-MINUS character token."
            Some('-') => {
                self.switch_to(on_dash);
                self.emit_character_token('-');
            }
            // "Anything else" "Reconsume in the script data state."
            _ => self.reconsume_in(TokenizerState::ScriptData),
        }
    }

    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    fn handle_script_data_escaped_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDash);
                self.emit_character_token('-');
            }
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            None => {
                self.parse_error(ErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    fn handle_script_data_escaped_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
                self.emit_character_token('-');
            }
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_character_token('\u{FFFD}');
            }
            None => {
                self.parse_error(ErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    fn handle_script_data_escaped_dash_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.emit_character_token('-'),
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            // "U+003E GREATER-THAN SIGN (>)"
            // "Switch to the script data state. Emit a U+003E GREATER-THAN SIGN character token."
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_character_token('\u{FFFD}');
            }
            None => {
                self.parse_error(ErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    fn handle_script_data_escaped_less_than_sign_state(&mut self, c: Option<char>) {
        match c {
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEscapedEndTagOpen);
            }
            // "ASCII alpha"
            // "Set the temporary buffer to the empty string. Emit a U+003C LESS-THAN SIGN
            // character token. Reconsume in the script data double escape start state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.clear();
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptDataDoubleEscapeStart);
            }
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    ///
    /// The two states are mirror images: on a boundary character, switch to
    /// `on_script` if the temporary buffer is "script", else to `otherwise`.
    fn handle_script_data_double_escape_boundary_state(
        &mut self,
        c: Option<char>,
        on_script: TokenizerState,
        otherwise: TokenizerState,
    ) {
        match c {
            Some(c) if Self::is_whitespace_char(c) || c == '/' || c == '>' => {
                if self.temporary_buffer == "script" {
                    self.switch_to(on_script);
                } else {
                    self.switch_to(otherwise);
                }
                self.emit_character_token(c);
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.push(c.to_ascii_lowercase());
                self.emit_character_token(c);
            }
            _ => self.reconsume_in(otherwise),
        }
    }

    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    fn handle_script_data_double_escaped_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDash);
                self.emit_character_token('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.emit_character_token('\u{FFFD}');
            }
            None => {
                self.parse_error(ErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    fn handle_script_data_double_escaped_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDashDash);
                self.emit_character_token('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_character_token('\u{FFFD}');
            }
            None => {
                self.parse_error(ErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    fn handle_script_data_double_escaped_dash_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.emit_character_token('-'),
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_character_token('\u{FFFD}');
            }
            None => {
                self.parse_error(ErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof_token();
            }
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    fn handle_script_data_double_escaped_less_than_sign_state(&mut self, c: Option<char>) {
        match c {
            // "U+002F SOLIDUS (/)"
            // "Set the temporary buffer to the empty string. Switch to the script data
            // double escape end state. Emit a U+002F SOLIDUS character token."
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataDoubleEscapeEnd);
                self.emit_character_token('/');
            }
            _ => self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped),
        }
    }

    // =========================================================================
    // Tags and attributes
    // =========================================================================

    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    fn handle_tag_open_state(&mut self, c: Option<char>) {
        match c {
            // "U+0021 EXCLAMATION MARK (!)"
            // "Switch to the markup declaration open state."
            Some('!') => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/)"
            // "Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha"
            // "Create a new start tag token, set its tag name to the empty string.
            // Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = TagBuilder::new(TagKind::Start);
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?)"
            // "This is an unexpected-question-mark-instead-of-tag-name parse error. Create a
            // comment token whose data is the empty string. Reconsume in the bogus comment state."
            Some('?') => {
                self.parse_error(ErrorKind::UnexpectedQuestionMarkInsteadOfTagName);
                self.current_comment.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "EOF"
            // "This is an eof-before-tag-name parse error. Emit a U+003C LESS-THAN SIGN
            // character token and an end-of-file token."
            None => {
                self.parse_error(ErrorKind::EofBeforeTagName);
                self.emit_character_token('<');
                self.emit_eof_token();
            }
            // "Anything else"
            // "This is an invalid-first-character-of-tag-name parse error. Emit a U+003C
            // LESS-THAN SIGN character token. Reconsume in the data state."
            Some(_) => {
                self.parse_error(ErrorKind::InvalidFirstCharacterOfTagName);
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    fn handle_end_tag_open_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_tag = TagBuilder::new(TagKind::End);
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is a missing-end-tag-name parse error. Switch to the data state."
            Some('>') => {
                self.parse_error(ErrorKind::MissingEndTagName);
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error(ErrorKind::EofBeforeTagName);
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.emit_eof_token();
            }
            // "Anything else"
            // "This is an invalid-first-character-of-tag-name parse error. Create a comment
            // token whose data is the empty string. Reconsume in the bogus comment state."
            Some(_) => {
                self.parse_error(ErrorKind::InvalidFirstCharacterOfTagName);
                self.current_comment.clear();
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    fn handle_tag_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.current_tag.name.push('\u{FFFD}');
            }
            // "EOF"
            // "This is an eof-in-tag parse error. Emit an end-of-file token."
            None => {
                self.parse_error(ErrorKind::EofInTag);
                self.emit_eof_token();
            }
            // "ASCII upper alpha" is lowercased; "Anything else" is appended as is.
            Some(c) => self.current_tag.name.push(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    fn handle_before_attribute_name_state(&mut self, c: Option<char>) {
        match c {
            // "Ignore the character."
            Some(c) if Self::is_whitespace_char(c) => {}
            // "U+002F SOLIDUS (/)" "U+003E GREATER-THAN SIGN (>)" "EOF"
            // "Reconsume in the after attribute name state."
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "U+003D EQUALS SIGN (=)"
            // "This is an unexpected-equals-sign-before-attribute-name parse error. Start a
            // new attribute in the current tag token. Set that attribute's name to the current
            // input character, and its value to the empty string. Switch to the attribute
            // name state."
            Some('=') => {
                self.parse_error(ErrorKind::UnexpectedEqualsSignBeforeAttributeName);
                self.current_tag.start_attribute();
                self.current_tag.push_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            // "Anything else"
            // "Start a new attribute in the current tag token. Set that attribute name and
            // value to the empty string. Reconsume in the attribute name state."
            Some(_) => {
                self.current_tag.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    fn handle_attribute_name_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ' | '/' | '>') | None => {
                self.leave_attribute_name();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('=') => {
                self.leave_attribute_name();
                self.switch_to(TokenizerState::BeforeAttributeValue);
            }
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.current_tag.push_attribute_name('\u{FFFD}');
            }
            // "U+0022 QUOTATION MARK (")" "U+0027 APOSTROPHE (')" "U+003C LESS-THAN SIGN (<)"
            // "This is an unexpected-character-in-attribute-name parse error. Treat it as
            // per the "anything else" entry below."
            Some(c @ ('"' | '\'' | '<')) => {
                self.parse_error(ErrorKind::UnexpectedCharacterInAttributeName);
                self.current_tag.push_attribute_name(c);
            }
            Some(c) => self.current_tag.push_attribute_name(c.to_ascii_lowercase()),
        }
    }

    /// "When the user agent leaves the attribute name state (and before emitting
    /// the tag token, if appropriate), the complete attribute's name must be
    /// compared to the other attributes on the same token"
    fn leave_attribute_name(&mut self) {
        if self.current_tag.check_duplicate_attribute() {
            self.parse_error(ErrorKind::DuplicateAttribute);
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    fn handle_after_attribute_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => {
                self.parse_error(ErrorKind::EofInTag);
                self.emit_eof_token();
            }
            Some(_) => {
                self.current_tag.start_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    fn handle_before_attribute_value_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is a missing-attribute-value parse error. Switch to the data state.
            // Emit the current tag token."
            Some('>') => {
                self.parse_error(ErrorKind::MissingAttributeValue);
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    fn handle_attribute_value_quoted_state(&mut self, c: Option<char>, quote: char) {
        match c {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            Some('&') => {
                self.return_state = self.state;
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.current_tag.push_attribute_value('\u{FFFD}');
            }
            None => {
                self.parse_error(ErrorKind::EofInTag);
                self.emit_eof_token();
            }
            Some(c) => self.current_tag.push_attribute_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    fn handle_attribute_value_unquoted_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('&') => {
                self.return_state = TokenizerState::AttributeValueUnquoted;
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.current_tag.push_attribute_value('\u{FFFD}');
            }
            Some(c @ ('"' | '\'' | '<' | '=' | '`')) => {
                self.parse_error(ErrorKind::UnexpectedCharacterInUnquotedAttributeValue);
                self.current_tag.push_attribute_value(c);
            }
            None => {
                self.parse_error(ErrorKind::EofInTag);
                self.emit_eof_token();
            }
            Some(c) => self.current_tag.push_attribute_value(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    fn handle_after_attribute_value_quoted_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => {
                self.parse_error(ErrorKind::EofInTag);
                self.emit_eof_token();
            }
            Some(_) => {
                self.parse_error(ErrorKind::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    fn handle_self_closing_start_tag_state(&mut self, c: Option<char>) {
        match c {
            // "U+003E GREATER-THAN SIGN (>)"
            // "Set the self-closing flag of the current tag token. Switch to the data state.
            // Emit the current tag token."
            Some('>') => {
                self.current_tag.self_closing = true;
                self.switch_to(TokenizerState::Data);
                self.emit_current_tag();
            }
            None => {
                self.parse_error(ErrorKind::EofInTag);
                self.emit_eof_token();
            }
            Some(_) => {
                self.parse_error(ErrorKind::UnexpectedSolidusInTag);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    // =========================================================================
    // Markup declarations and comments
    // =========================================================================

    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// Nothing is consumed until the lookahead is decided, so a chunk boundary
    /// inside `<!DOC` suspends here and resumes cleanly.
    fn handle_markup_declaration_open_state(&mut self) -> bool {
        // "If the next two characters are both U+002D HYPHEN-MINUS characters (-),
        // consume those two characters, create a comment token whose data is the empty
        // string, and switch to the comment start state."
        match self.input.lookahead("--", false) {
            MatchResult::Matched => {
                self.consume_word("--");
                self.current_comment.clear();
                self.switch_to(TokenizerState::CommentStart);
                return true;
            }
            MatchResult::NeedMoreInput => return false,
            MatchResult::NoMatch => {}
        }
        // "Otherwise, if the next seven characters are an ASCII case-insensitive
        // match for the word "DOCTYPE", consume those characters and switch to the
        // DOCTYPE state."
        match self.input.lookahead("DOCTYPE", true) {
            MatchResult::Matched => {
                self.consume_word("DOCTYPE");
                self.switch_to(TokenizerState::DOCTYPE);
                return true;
            }
            MatchResult::NeedMoreInput => return false,
            MatchResult::NoMatch => {}
        }
        // "Otherwise, if the next seven characters are a case-sensitive match for the
        // string "[CDATA[" (the five uppercase letters "CDATA" with a U+005B LEFT SQUARE
        // BRACKET character before and after), then consume those characters and:
        // if there is an adjusted current node and it is not an element in the HTML
        // namespace, then switch to the CDATA section state. Otherwise, this is a
        // cdata-in-html-content parse error. Create a comment token whose data is the
        // "[CDATA[" string. Switch to the bogus comment state."
        match self.input.lookahead("[CDATA[", false) {
            MatchResult::Matched => {
                self.consume_word("[CDATA[");
                if self.cdata_allowed {
                    self.switch_to(TokenizerState::CDATASection);
                } else {
                    self.parse_error(ErrorKind::CdataInHtmlContent);
                    self.current_comment.clear();
                    self.current_comment.push_str("[CDATA[");
                    self.switch_to(TokenizerState::BogusComment);
                }
                return true;
            }
            MatchResult::NeedMoreInput => return false,
            MatchResult::NoMatch => {}
        }
        // "Otherwise, this is an incorrectly-opened-comment parse error. Create a
        // comment token whose data is the empty string. Switch to the bogus comment state
        // (don't consume anything in the current state)."
        self.parse_error(ErrorKind::IncorrectlyOpenedComment);
        self.current_comment.clear();
        self.switch_to(TokenizerState::BogusComment);
        true
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    fn handle_bogus_comment_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment();
            }
            None => {
                self.emit_current_comment();
                self.emit_eof_token();
            }
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.current_comment.push('\u{FFFD}');
            }
            Some(c) => self.current_comment.push(c),
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    fn handle_comment_start_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is an abrupt-closing-of-empty-comment parse error. Switch to the data
            // state. Emit the current comment token."
            Some('>') => {
                self.parse_error(ErrorKind::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment();
            }
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    fn handle_comment_start_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => {
                self.parse_error(ErrorKind::AbruptClosingOfEmptyComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.current_comment.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    fn handle_comment_state(&mut self, c: Option<char>) {
        match c {
            Some('<') => {
                self.current_comment.push('<');
                self.switch_to(TokenizerState::CommentLessThanSign);
            }
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.current_comment.push('\u{FFFD}');
            }
            None => self.eof_in_comment(),
            Some(c) => self.current_comment.push(c),
        }
    }

    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    fn handle_comment_less_than_sign_state(&mut self, c: Option<char>) {
        match c {
            Some('!') => {
                self.current_comment.push('!');
                self.switch_to(TokenizerState::CommentLessThanSignBang);
            }
            Some('<') => self.current_comment.push('<'),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    fn handle_comment_less_than_sign_bang_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentLessThanSignBangDash),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    fn handle_comment_less_than_sign_bang_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentLessThanSignBangDashDash),
            _ => self.reconsume_in(TokenizerState::CommentEndDash),
        }
    }

    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    fn handle_comment_less_than_sign_bang_dash_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('>') | None => self.reconsume_in(TokenizerState::CommentEnd),
            // "Anything else"
            // "This is a nested-comment parse error. Reconsume in the comment end state."
            Some(_) => {
                self.parse_error(ErrorKind::NestedComment);
                self.reconsume_in(TokenizerState::CommentEnd);
            }
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    fn handle_comment_end_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => self.eof_in_comment(),
            Some(_) => {
                self.current_comment.push('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    fn handle_comment_end_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment();
            }
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            Some('-') => self.current_comment.push('-'),
            None => self.eof_in_comment(),
            // "Anything else"
            // "Append two U+002D HYPHEN-MINUS characters (-) to the comment token's data.
            // Reconsume in the comment state."
            Some(_) => {
                self.current_comment.push_str("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    fn handle_comment_end_bang_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.current_comment.push_str("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            Some('>') => {
                self.parse_error(ErrorKind::IncorrectlyClosedComment);
                self.switch_to(TokenizerState::Data);
                self.emit_current_comment();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.current_comment.push_str("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// "EOF: This is an eof-in-comment parse error. Emit the current comment
    /// token. Emit an end-of-file token."
    fn eof_in_comment(&mut self) {
        self.parse_error(ErrorKind::EofInComment);
        self.emit_current_comment();
        self.emit_eof_token();
    }

    // =========================================================================
    // DOCTYPE
    // =========================================================================

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    fn handle_doctype_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => self.switch_to(TokenizerState::BeforeDOCTYPEName),
            Some('>') => self.reconsume_in(TokenizerState::BeforeDOCTYPEName),
            // "EOF"
            // "This is an eof-in-doctype parse error. Create a new DOCTYPE token. Set its
            // force-quirks flag to on. Emit the current token. Emit an end-of-file token."
            None => {
                self.current_doctype = DoctypeBuilder::default();
                self.eof_in_doctype();
            }
            Some(_) => {
                self.parse_error(ErrorKind::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDOCTYPEName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    fn handle_before_doctype_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.start_doctype_name('\u{FFFD}');
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is a missing-doctype-name parse error. Create a new DOCTYPE token. Set its
            // force-quirks flag to on. Switch to the data state. Emit the current token."
            Some('>') => {
                self.parse_error(ErrorKind::MissingDoctypeName);
                self.current_doctype = DoctypeBuilder {
                    force_quirks: true,
                    ..DoctypeBuilder::default()
                };
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            None => {
                self.current_doctype = DoctypeBuilder::default();
                self.eof_in_doctype();
            }
            Some(c) => self.start_doctype_name(c.to_ascii_lowercase()),
        }
    }

    /// "Create a new DOCTYPE token. Set the token's name to the current input
    /// character. Switch to the DOCTYPE name state."
    fn start_doctype_name(&mut self, c: char) {
        self.current_doctype = DoctypeBuilder {
            name: Some(c.to_string()),
            ..DoctypeBuilder::default()
        };
        self.switch_to(TokenizerState::DOCTYPEName);
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    fn handle_doctype_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => self.switch_to(TokenizerState::AfterDOCTYPEName),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                self.current_doctype.name.get_or_insert_with(String::new).push('\u{FFFD}');
            }
            None => self.eof_in_doctype(),
            Some(c) => self
                .current_doctype
                .name
                .get_or_insert_with(String::new)
                .push(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    ///
    /// "If the six characters starting from the current input character are an
    /// ASCII case-insensitive match for the word "PUBLIC", then consume those
    /// characters and switch to the after DOCTYPE public keyword state.
    /// Otherwise, if the six characters starting from the current input
    /// character are an ASCII case-insensitive match for the word "SYSTEM",
    /// then consume those characters and switch to the after DOCTYPE system
    /// keyword state."
    ///
    /// Checked before consuming: `Some(progress)` if this step was decided
    /// here, `None` to fall through to the per-character rules.
    fn match_doctype_keyword(&mut self) -> Option<bool> {
        for (keyword, next_state) in [
            ("PUBLIC", TokenizerState::AfterDOCTYPEPublicKeyword),
            ("SYSTEM", TokenizerState::AfterDOCTYPESystemKeyword),
        ] {
            match self.input.lookahead(keyword, true) {
                MatchResult::Matched => {
                    self.consume_word(keyword);
                    self.switch_to(next_state);
                    return Some(true);
                }
                MatchResult::NeedMoreInput => return Some(false),
                MatchResult::NoMatch => {}
            }
        }
        None
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    fn handle_after_doctype_name_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            None => self.eof_in_doctype(),
            // "Otherwise, this is an invalid-character-sequence-after-doctype-name parse
            // error. Set the current DOCTYPE token's force-quirks flag to on. Reconsume in
            // the bogus DOCTYPE state."
            Some(_) => {
                self.parse_error(ErrorKind::InvalidCharacterSequenceAfterDoctypeName);
                self.current_doctype.force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    fn handle_after_doctype_keyword_state(&mut self, c: Option<char>, before_identifier: TokenizerState, id: DoctypeId) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => self.switch_to(before_identifier),
            // "U+0022 QUOTATION MARK (")"
            // "This is a missing-whitespace-after-doctype-public-keyword parse error. Set the
            // current DOCTYPE token's public identifier to the empty string (not missing),
            // then switch to the DOCTYPE public identifier (double-quoted) state."
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(id.missing_whitespace_after_keyword());
                self.start_doctype_identifier(id, quote);
            }
            _ => self.handle_doctype_identifier_fallback(c, id),
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    fn handle_before_doctype_identifier_state(&mut self, c: Option<char>, id: DoctypeId) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.start_doctype_identifier(id, quote),
            _ => self.handle_doctype_identifier_fallback(c, id),
        }
    }

    /// The `>`, EOF and "anything else" entries shared by the keyword and
    /// before-identifier states.
    fn handle_doctype_identifier_fallback(&mut self, c: Option<char>, id: DoctypeId) {
        match c {
            // "This is a missing-doctype-public-identifier parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Switch to the data state. Emit the
            // current DOCTYPE token."
            Some('>') => {
                self.parse_error(id.missing_identifier());
                self.current_doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            None => self.eof_in_doctype(),
            // "This is a missing-quote-before-doctype-public-identifier parse error. Set the
            // current DOCTYPE token's force-quirks flag to on. Reconsume in the bogus DOCTYPE
            // state."
            Some(_) => {
                self.parse_error(id.missing_quote());
                self.current_doctype.force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// Set the identifier to the empty string and switch to the quoted state
    /// matching `quote`.
    fn start_doctype_identifier(&mut self, id: DoctypeId, quote: char) {
        *id.slot(&mut self.current_doctype) = Some(String::new());
        let next = match (id, quote) {
            (DoctypeId::Public, '"') => TokenizerState::DOCTYPEPublicIdentifierDoubleQuoted,
            (DoctypeId::Public, _) => TokenizerState::DOCTYPEPublicIdentifierSingleQuoted,
            (DoctypeId::System, '"') => TokenizerState::DOCTYPESystemIdentifierDoubleQuoted,
            (DoctypeId::System, _) => TokenizerState::DOCTYPESystemIdentifierSingleQuoted,
        };
        self.switch_to(next);
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// and the single-quoted and system identifier variants.
    fn handle_doctype_identifier_quoted_state(&mut self, c: Option<char>, quote: char, id: DoctypeId) {
        match c {
            Some(c) if c == quote => self.switch_to(match id {
                DoctypeId::Public => TokenizerState::AfterDOCTYPEPublicIdentifier,
                DoctypeId::System => TokenizerState::AfterDOCTYPESystemIdentifier,
            }),
            Some('\0') => {
                self.parse_error(ErrorKind::UnexpectedNullCharacter);
                id.slot(&mut self.current_doctype)
                    .get_or_insert_with(String::new)
                    .push('\u{FFFD}');
            }
            // "U+003E GREATER-THAN SIGN (>)"
            // "This is an abrupt-doctype-public-identifier parse error. Set the current
            // DOCTYPE token's force-quirks flag to on. Switch to the data state. Emit the
            // current DOCTYPE token."
            Some('>') => {
                self.parse_error(id.abrupt());
                self.current_doctype.force_quirks = true;
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            None => self.eof_in_doctype(),
            Some(c) => id
                .slot(&mut self.current_doctype)
                .get_or_insert_with(String::new)
                .push(c),
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    fn handle_after_doctype_public_identifier_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDOCTYPEPublicAndSystemIdentifiers);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(ErrorKind::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers);
                self.start_doctype_identifier(DoctypeId::System, quote);
            }
            None => self.eof_in_doctype(),
            Some(_) => {
                self.parse_error(ErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.current_doctype.force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    fn handle_between_doctype_public_and_system_identifiers_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            Some(quote @ ('"' | '\'')) => self.start_doctype_identifier(DoctypeId::System, quote),
            None => self.eof_in_doctype(),
            Some(_) => {
                self.parse_error(ErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.current_doctype.force_quirks = true;
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    fn handle_after_doctype_system_identifier_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            None => self.eof_in_doctype(),
            // "Anything else"
            // "This is an unexpected-character-after-doctype-system-identifier parse error.
            // Reconsume in the bogus DOCTYPE state. (This does not set the current DOCTYPE
            // token's force-quirks flag to on.)"
            Some(_) => {
                self.parse_error(ErrorKind::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDOCTYPE);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    fn handle_bogus_doctype_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_current_doctype();
            }
            Some('\0') => self.parse_error(ErrorKind::UnexpectedNullCharacter),
            // "EOF: Emit the DOCTYPE token. Emit an end-of-file token."
            None => {
                self.emit_current_doctype();
                self.emit_eof_token();
            }
            Some(_) => {}
        }
    }

    /// "This is an eof-in-doctype parse error. Set the current DOCTYPE token's
    /// force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    fn eof_in_doctype(&mut self) {
        self.parse_error(ErrorKind::EofInDoctype);
        self.current_doctype.force_quirks = true;
        self.emit_current_doctype();
        self.emit_eof_token();
    }

    // =========================================================================
    // CDATA
    // =========================================================================

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    fn handle_cdata_section_state(&mut self, c: Option<char>) {
        match c {
            Some(']') => self.switch_to(TokenizerState::CDATASectionBracket),
            None => {
                self.parse_error(ErrorKind::EofInCdata);
                self.emit_eof_token();
            }
            // U+0000 NULL is emitted as is here; the tree builder handles it.
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    fn handle_cdata_section_bracket_state(&mut self, c: Option<char>) {
        match c {
            Some(']') => self.switch_to(TokenizerState::CDATASectionEnd),
            _ => {
                self.emit_character_token(']');
                self.reconsume_in(TokenizerState::CDATASection);
            }
        }
    }

    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    fn handle_cdata_section_end_state(&mut self, c: Option<char>) {
        match c {
            Some(']') => self.emit_character_token(']'),
            Some('>') => self.switch_to(TokenizerState::Data),
            _ => {
                self.emit_character_token(']');
                self.emit_character_token(']');
                self.reconsume_in(TokenizerState::CDATASection);
            }
        }
    }
}

/// Which DOCTYPE identifier a shared state is working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DoctypeId {
    Public,
    System,
}

impl DoctypeId {
    fn slot(self, doctype: &mut DoctypeBuilder) -> &mut Option<String> {
        match self {
            Self::Public => &mut doctype.public_identifier,
            Self::System => &mut doctype.system_identifier,
        }
    }

    const fn missing_whitespace_after_keyword(self) -> ErrorKind {
        match self {
            Self::Public => ErrorKind::MissingWhitespaceAfterDoctypePublicKeyword,
            Self::System => ErrorKind::MissingWhitespaceAfterDoctypeSystemKeyword,
        }
    }

    const fn missing_identifier(self) -> ErrorKind {
        match self {
            Self::Public => ErrorKind::MissingDoctypePublicIdentifier,
            Self::System => ErrorKind::MissingDoctypeSystemIdentifier,
        }
    }

    const fn missing_quote(self) -> ErrorKind {
        match self {
            Self::Public => ErrorKind::MissingQuoteBeforeDoctypePublicIdentifier,
            Self::System => ErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier,
        }
    }

    const fn abrupt(self) -> ErrorKind {
        match self {
            Self::Public => ErrorKind::AbruptDoctypePublicIdentifier,
            Self::System => ErrorKind::AbruptDoctypeSystemIdentifier,
        }
    }
}
