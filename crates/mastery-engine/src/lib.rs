//! Mastery verification rules.
//!
//! A level is confirmed only when four independent dimensions of evidence meet
//! their targets:
//!
//! - **foundation**: retention checks on every level below the target
//! - **breadth**: distinct contexts passed at elevated difficulty
//! - **depth**: adversarial ("curveball") scenarios passed
//! - **application**: a capstone passed
//!
//! All dimension state is derived from the append-only evidence ledger. Status
//! rows cache the last evaluation and carry the lifecycle
//! (`provisional` → `confirmed`, `provisional` ⇄ `dormant`).
//!
//! ```
//! use mastery_core::{EngineConfig, ExerciseResult, LearnerId};
//! use mastery_engine::MasteryEngine;
//! use mastery_store::MemoryStore;
//!
//! let mut engine = MasteryEngine::new(MemoryStore::new(), EngineConfig::default());
//! let learner = LearnerId::parse("ada").unwrap();
//! engine.assign_level(&learner, 1).unwrap();
//!
//! let outcome = engine
//!     .process(&learner, &ExerciseResult::standard("warmup", 1, true, 0.9))
//!     .unwrap();
//! assert!(outcome.evidence_recorded.is_empty());
//! assert!(outcome.promotion_event().is_none());
//! ```

#![deny(missing_docs)]

/// Pure dimension calculators.
pub mod calculators;
/// Time source.
pub mod clock;
/// Dormancy monitor and return flow.
pub mod dormancy;
/// Engine facade.
pub mod engine;
/// Error types for engine operations.
pub mod error;
/// Gap detector.
pub mod gaps;
/// Exercise result intake.
pub mod intake;
/// Promotion evaluator.
pub mod promotion;
/// Progress ring views.
pub mod rings;
/// Serialized multi-threaded handle.
pub mod shared;

pub use calculators::DimensionReport;
pub use clock::{Clock, ManualClock, SystemClock};
pub use dormancy::{DormancyEvent, ReturnOutcome};
pub use engine::MasteryEngine;
pub use error::EngineError;
pub use gaps::Gap;
pub use intake::IntakeOutcome;
pub use promotion::{PromotionEvent, PromotionResult};
pub use rings::RingView;
pub use shared::SharedEngine;
