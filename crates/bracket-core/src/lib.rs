#![warn(missing_docs)]
//! Bracket Core - Headless Incremental Bracket Pair Colorizer
//!
//! # Overview
//!
//! `bracket-core` assigns nesting-aware colors to matching bracket pairs, classifies
//! unmatched ("orphan") brackets, and re-analyzes only the part of a document that an edit
//! invalidated. It does not tokenize source text and it does not paint anything: a
//! [`Tokenizer`] supplies a token tree, and render subscribers receive a [`ColorMap`]
//! (color → ranges) after every successful pass.
//!
//! # Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  DocumentSession / DocumentManager          │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Update Scheduler (dirty line + debounce)   │  ← When to recompute
//! ├─────────────────────────────────────────────┤
//! │  Color Map Aggregator (+ orphan sweep)      │  ← Renderer payload
//! ├─────────────────────────────────────────────┤
//! │  Bracket Matcher + Color Assigner           │  ← Nesting stacks
//! ├─────────────────────────────────────────────┤
//! │  Line Cache (carry-over state per line)     │  ← Incrementality
//! ├─────────────────────────────────────────────┤
//! │  Position Mapper (token tree → occurrences) │  ← Bracket locations
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use bracket_core::{Color, DocumentSession, Settings, Token, TokenCategory, TokenizeError};
//! use std::sync::Arc;
//!
//! let settings = Settings::consecutive(
//!     [("(", ")")],
//!     ["Gold", "Orchid"],
//!     "Red",
//! )
//! .unwrap();
//!
//! // A toy tokenizer: every `(`/`)` is punctuation, everything else is plain text.
//! let tokenizer = |text: &str| -> Result<Token, TokenizeError> {
//!     Ok(Token::List(
//!         text.chars()
//!             .map(|c| match c {
//!                 '(' | ')' => Token::node(TokenCategory::Punctuation, Token::text(c)),
//!                 _ => Token::text(c),
//!             })
//!             .collect(),
//!     ))
//! };
//!
//! let mut session = DocumentSession::new(Arc::new(settings), tokenizer, "(()");
//! session.refresh();
//!
//! let colors = session.colors();
//! assert_eq!(colors.ranges(&Color::from("Gold")).len(), 0);
//! assert_eq!(colors.ranges(&Color::from("Orchid")).len(), 2);
//! assert_eq!(colors.ranges(&Color::from("Red")).len(), 1);
//! ```
//!
//! # Module Description
//!
//! - [`token`] - token tree model and the [`Tokenizer`] seam
//! - [`position`] - positions, ranges and the position mapper
//! - [`pair`] - pair definitions, colors and the combined literal pattern
//! - [`settings`] - validated configuration (programmatic or JSON)
//! - [`line_cache`] - per-line matching state with carry-over
//! - [`matcher`] - stack-based matching and color assignment
//! - [`color_map`] - document-wide color → ranges aggregation
//! - [`scheduler`] - lowest-dirty-line tracking and debounce
//! - [`session`] - per-document pipeline owner
//! - [`manager`] - multi-document registry
//! - [`scope`] - matched pairs and enclosing-pair queries

pub mod color_map;
pub mod error;
pub mod line_cache;
pub mod manager;
pub mod matcher;
pub mod pair;
pub mod position;
pub mod scheduler;
pub mod scope;
pub mod session;
pub mod settings;
pub mod token;

pub use color_map::ColorMap;
pub use error::{OpenError, SettingsError, TokenizeError};
pub use line_cache::{LineCache, LineState};
pub use manager::{DocumentId, DocumentManager, TokenizerProvider};
pub use matcher::{BracketMatcher, BracketStatus, ColoredOccurrence, MatchStack, StackEntry};
pub use pair::{BracketRole, Color, LiteralTable, PairDefinition, PairId};
pub use position::{BracketRange, MappedTokens, Occurrence, Position, map_occurrences};
pub use scheduler::{Schedule, UpdateScheduler};
pub use scope::{BracketPair, BracketPairs, OrphanBracket};
pub use session::{DocumentSession, PassOutcome, RenderCallback};
pub use settings::{ColorMode, PairSpec, Settings};
pub use token::{Token, TokenCategory, Tokenizer};
