//! Custom target modes.
//!
//! A card effect names a target mode; the host resolves its own modes and
//! hands custom ones to the [`TargetPipeline`]. The pipeline runs the bound
//! selector through the same stages for the preview the player sees while
//! aiming and for the committing pass that actually applies the effect.
//!
//! ## Key Components
//!
//! - [`TargetModeId`]: Opaque mode identifier (host ids are reserved)
//! - [`EntitySelector`] / [`CardSelector`]: What content implements
//! - [`TargetSelectorRegistry`]: One selector per mode
//! - [`SharedFilter`]: Health, status, subtype and exclusion rules
//! - [`TargetPipeline`]: Collection, filtering and final selection
//!
//! ## Example Usage
//!
//! ```
//! use combat_extend::core::{ExtensionConfig, RoomIndex};
//! use combat_extend::host::{MemoryCombat, NewCharacter};
//! use combat_extend::targeting::{
//!     builtin::ByAttack, TargetModeId, TargetPipeline, TargetSelector, TargetSelectorRegistry,
//!     TargetingContext,
//! };
//!
//! const HIGHEST_ATTACK: TargetModeId = TargetModeId::new(40);
//!
//! let config = ExtensionConfig::new();
//! let mut registry = TargetSelectorRegistry::new(&config);
//! registry.bind_selector(HIGHEST_ATTACK, TargetSelector::entity(ByAttack::highest())).unwrap();
//! let pipeline = TargetPipeline::new(registry, &config);
//!
//! let mut host = MemoryCombat::new(1);
//! host.add_character(NewCharacter::hero(0).attack(2));
//! let brute = host.add_character(NewCharacter::hero(0).attack(9));
//!
//! let mut targets = Vec::new();
//! let ctx = TargetingContext::new(HIGHEST_ATTACK, RoomIndex(0));
//! assert!(pipeline.resolve(&ctx, &host, &mut targets));
//! assert_eq!(targets, vec![brute]);
//! ```

pub mod builtin;
mod context;
mod filter;
mod mode;
mod pipeline;
mod registry;
mod selector;

pub use builtin::BUILTIN_MODE_NAMES;
pub use context::{HealthFilter, TargetingContext};
pub use filter::SharedFilter;
pub use mode::{CardTargetCategory, SelectorKind, TargetModeFlags, TargetModeId};
pub use pipeline::TargetPipeline;
pub use registry::TargetSelectorRegistry;
pub use selector::{CardSelector, EntitySelector, TargetSelector};
