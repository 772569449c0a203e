//! Lexical introspection of controller source units.
//!
//! A single pass over the token stream recovers the declared controller type,
//! its public actions in declaration order, and each action's parameter names.
//!
//! # State Machine
//! ```text
//! Seek ──extends──▶ InExtends ──public──▶ InVisibility
//!  │  ──class────▶ InClassName ──ident──▶ Seek
//!  │  ──public───▶ InVisibility ──function──▶ InActionName
//!  │                    └──other──▶ Seek
//! InActionName ──ident──▶ InParamListSeek ──(──▶ InParamList ──)──▶ Seek
//! ```
//!
//! # Design Decisions
//! - Best-effort scan, not a parser: malformed input never fails, the scan
//!   stops at end of stream with whatever was captured
//! - Nested brackets inside default values are depth-tracked, so
//!   `$opts = array(1, 2)` neither closes the list early nor adds parameters

use crate::routing::lexer::{Keyword, Lexer, Token, TokenKind};
use crate::routing::table::{ActionDescriptor, ControllerDescriptor};

/// Names that follow `function` but never open an action.
const RESERVED_NAMES: [&str; 4] = ["true", "false", "null", "__construct"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Seek,
    InExtends,
    InClassName,
    InVisibility,
    InActionName,
    InParamListSeek,
    InParamList,
}

/// Bookkeeping for the parameter slot currently being scanned.
#[derive(Debug, Default)]
struct ParamSlot {
    has_param: bool,
    defaulted: bool,
    variadic: bool,
}

struct Scan {
    state: ScanState,
    controllers: Vec<ControllerDescriptor>,
    action: Option<ActionDescriptor>,
    depth: usize,
    slot: ParamSlot,
    after_double_colon: bool,
}

impl Scan {
    fn new() -> Self {
        Self {
            state: ScanState::Seek,
            controllers: Vec::new(),
            action: None,
            depth: 0,
            slot: ParamSlot::default(),
            after_double_colon: false,
        }
    }

    fn step(&mut self, token: Token<'_>) {
        let after_double_colon = std::mem::replace(&mut self.after_double_colon, token.is_punct("::"));

        match self.state {
            ScanState::Seek => self.seek(token, after_double_colon),
            ScanState::InExtends => match token.kind {
                TokenKind::Keyword(Keyword::Public) => self.state = ScanState::InVisibility,
                TokenKind::Keyword(Keyword::Protected | Keyword::Private) => {
                    self.state = ScanState::Seek
                }
                _ => {}
            },
            ScanState::InClassName => {
                if token.kind == TokenKind::Identifier {
                    self.controllers.push(ControllerDescriptor::new(token.text));
                }
                // Anything else is an anonymous class; nothing to record.
                self.state = ScanState::Seek;
            }
            ScanState::InVisibility => {
                if token.is_keyword(Keyword::Function) {
                    self.state = ScanState::InActionName;
                } else {
                    self.state = ScanState::Seek;
                    self.seek(token, after_double_colon);
                }
            }
            ScanState::InActionName => self.action_name(token),
            ScanState::InParamListSeek => {
                if token.is_punct("(") {
                    self.depth = 0;
                    self.slot = ParamSlot::default();
                    self.state = ScanState::InParamList;
                }
            }
            ScanState::InParamList => self.param_list(token),
        }
    }

    fn seek(&mut self, token: Token<'_>, after_double_colon: bool) {
        match token.kind {
            TokenKind::Keyword(Keyword::Extends) => self.state = ScanState::InExtends,
            // `Foo::class` is a constant lookup, not a declaration.
            TokenKind::Keyword(Keyword::Class) if !after_double_colon => {
                self.state = ScanState::InClassName
            }
            TokenKind::Keyword(Keyword::Public) => self.state = ScanState::InVisibility,
            _ => {}
        }
    }

    fn action_name(&mut self, token: Token<'_>) {
        match token.kind {
            TokenKind::Identifier => {
                let reserved = RESERVED_NAMES
                    .iter()
                    .any(|name| token.text.eq_ignore_ascii_case(name));

                if reserved || self.controllers.is_empty() {
                    self.state = ScanState::Seek;
                } else {
                    self.action = Some(ActionDescriptor::new(token.text));
                    self.state = ScanState::InParamListSeek;
                }
            }
            // Return by reference: `function &items()`.
            TokenKind::Punct if token.text == "&" => {}
            _ => self.state = ScanState::Seek,
        }
    }

    fn param_list(&mut self, token: Token<'_>) {
        if self.depth > 0 {
            match token.text {
                "(" | "[" | "{" if token.kind == TokenKind::Punct => self.depth += 1,
                ")" | "]" | "}" if token.kind == TokenKind::Punct => self.depth -= 1,
                _ => {}
            }
            return;
        }

        match token.kind {
            TokenKind::Variable if !self.slot.has_param => {
                if let Some(action) = self.action.as_mut() {
                    action.push_param(&token.text[1..]);
                }
                self.slot.has_param = true;
            }
            TokenKind::Punct => match token.text {
                "," => self.close_slot(),
                ")" => {
                    self.close_slot();
                    self.finish_action();
                }
                "=" if self.slot.has_param => self.slot.defaulted = true,
                "." if !self.slot.has_param => self.slot.variadic = true,
                "(" | "[" | "{" => self.depth += 1,
                _ => {}
            },
            _ => {}
        }
    }

    fn close_slot(&mut self) {
        let slot = std::mem::take(&mut self.slot);
        if slot.has_param && !slot.defaulted && !slot.variadic {
            if let Some(action) = self.action.as_mut() {
                let bound = action.params().len();
                action.set_required(bound);
            }
        }
    }

    fn finish_action(&mut self) {
        if let (Some(action), Some(controller)) = (self.action.take(), self.controllers.last_mut()) {
            controller.insert_action(action);
        }
        self.state = ScanState::Seek;
    }

    fn finish(mut self) -> Vec<ControllerDescriptor> {
        if self.action.is_some() {
            self.close_slot();
            self.finish_action();
        }
        self.controllers
    }
}

/// Scan a source unit and return every controller type it declares, in order.
pub fn introspect_all(source: &str) -> Vec<ControllerDescriptor> {
    let mut scan = Scan::new();
    for token in Lexer::new(source) {
        scan.step(token);
    }
    scan.finish()
}

/// Scan a source unit and return its (first) declared controller type.
pub fn introspect(source: &str) -> Option<ControllerDescriptor> {
    introspect_all(source).into_iter().next()
}
