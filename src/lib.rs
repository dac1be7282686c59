//! keytrap - keyboard shortcut matching
//!
//! Register callbacks against shortcut strings and feed raw key events in;
//! the matching callback runs when the keys are pressed.
//!
//! - Single keys (`"z"`, `"*"`), combos (`"command+shift+o"`, `"mod+s"`)
//! - Sequences (`"g i"`, `"up up down down"`) with a timeout between steps
//! - Character-code and key-code events normalized to one key space
//! - Callbacks return `false` to suppress the event's default action
//!
//! # Architecture
//!
//! ```text
//! KeyEvent → KeyNormalizer → Trigger → BindingTable / SequenceMatcher → callback
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut resolver = Resolver::new();
//! resolver.bind("mod+s", |_event: &KeyEvent, _combo: &str| false)?;
//! resolver.bind(["g i", "g a"], |_event: &KeyEvent, combo: &str| {
//!     println!("went to {combo}");
//! })?;
//!
//! let mut event = KeyEvent::press('g');
//! resolver.resolve(&mut event);
//! ```

pub mod binding;
pub mod config;
pub mod config_paths;
pub mod event;
pub mod logging;
pub mod normalizer;
pub mod parser;
pub mod resolver;
pub mod sequence;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use binding::{Binding, Handler, Propagation};
pub use config::{ConfigError, MatcherConfig, ModKey};
pub use event::KeyEvent;
pub use normalizer::{KeyNormalizer, NoQuirks, OptionLayerQuirks, PlatformQuirks};
pub use parser::{Aliases, ShortcutError};
pub use resolver::{Resolution, Resolver};
pub use sequence::{SequenceMatcher, SequenceOutcome, DEFAULT_SEQUENCE_TIMEOUT};
pub use table::{BindingTable, IntoShortcuts, Shortcut};
pub use types::{Combo, EventPhase, KeyCode, Modifiers, Trigger};
