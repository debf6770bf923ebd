//! Fuzz target for the [`SessionPhase`] lifecycle
//!
//! # Invariants
//!
//! - Phases only ever move forward
//! - `Active` is only reachable through `Announcing`
//! - No transition out of `Terminated`

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use snats_core::SessionPhase;

#[derive(Debug, Clone, Copy, Arbitrary)]
enum Target {
    Connecting,
    Announcing,
    Active,
    Leaving,
    Terminated,
}

impl From<Target> for SessionPhase {
    fn from(target: Target) -> Self {
        match target {
            Target::Connecting => Self::Connecting,
            Target::Announcing => Self::Announcing,
            Target::Active => Self::Active,
            Target::Leaving => Self::Leaving,
            Target::Terminated => Self::Terminated,
        }
    }
}

fn rank(phase: SessionPhase) -> u8 {
    match phase {
        SessionPhase::Connecting => 0,
        SessionPhase::Announcing => 1,
        SessionPhase::Active => 2,
        SessionPhase::Leaving => 3,
        SessionPhase::Terminated => 4,
    }
}

fuzz_target!(|targets: Vec<Target>| {
    let mut phase = SessionPhase::default();

    for target in targets {
        let Ok(advanced) = phase.advance(SessionPhase::from(target)) else { continue };

        assert!(!phase.is_terminal());
        assert!(rank(advanced) > rank(phase));
        if advanced == SessionPhase::Active {
            assert_eq!(phase, SessionPhase::Announcing);
        }
        phase = advanced;
    }
});
