//! Ceiling enforcement for synthesis parameters
//!
//! Every value headed for the synthesizer passes through
//! [`ParameterGuard::apply`]. Only the upper bound is enforced: negative
//! values pass through unchanged.

use log::warn;
use serde::{Deserialize, Serialize};

use super::{Ceilings, ControlError, ParamKind, Parameters};
use crate::synth::Synthesizer;

/// What to do with a request above its ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardPolicy {
    /// Drop the request and keep the previous value
    Reject,
    /// Apply the ceiling itself
    #[default]
    Clamp,
}

/// Result of guarding one request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardOutcome {
    /// Within bounds, applied as requested
    Accepted(f64),
    /// Over the ceiling, the ceiling was applied instead
    Clamped(f64),
    /// Not applied; the previous value stands
    Rejected { requested: f64, ceiling: f64 },
}

impl GuardOutcome {
    /// The value that reached the synthesizer, if any
    pub fn applied(&self) -> Option<f64> {
        match *self {
            GuardOutcome::Accepted(v) | GuardOutcome::Clamped(v) => Some(v),
            GuardOutcome::Rejected { .. } => None,
        }
    }
}

/// Validates parameter requests against fixed ceilings
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGuard {
    ceilings: Ceilings,
    policy: GuardPolicy,
}

impl ParameterGuard {
    pub fn new(ceilings: Ceilings, policy: GuardPolicy) -> Self {
        Self { ceilings, policy }
    }

    pub fn ceilings(&self) -> &Ceilings {
        &self.ceilings
    }

    pub fn policy(&self) -> GuardPolicy {
        self.policy
    }

    /// Decide what value, if any, a request turns into
    pub fn apply(&self, kind: ParamKind, requested: f64) -> GuardOutcome {
        let ceiling = self.ceilings.get(kind);

        if !requested.is_finite() {
            warn!("rejecting non-finite {} request", kind);
            return GuardOutcome::Rejected { requested, ceiling };
        }

        if requested <= ceiling {
            return GuardOutcome::Accepted(requested);
        }

        let err = ControlError::ParameterOverCeiling {
            kind,
            requested,
            ceiling,
        };
        match self.policy {
            GuardPolicy::Reject => {
                warn!("{}, keeping previous value", err);
                GuardOutcome::Rejected { requested, ceiling }
            }
            GuardPolicy::Clamp => {
                warn!("{}, clamping", err);
                GuardOutcome::Clamped(ceiling)
            }
        }
    }

    /// Guard a request and push the result to the mirror and synthesizer
    pub fn apply_to<S: Synthesizer + ?Sized>(
        &self,
        kind: ParamKind,
        requested: f64,
        params: &mut Parameters,
        synth: &mut S,
    ) -> GuardOutcome {
        let outcome = self.apply(kind, requested);
        if let Some(value) = outcome.applied() {
            params.set(kind, value);
            match kind {
                ParamKind::Frequency => synth.set_frequency(value),
                ParamKind::Amplitude => synth.set_amplitude(value),
                ParamKind::RampTime => synth.set_ramp_time(value),
                ParamKind::EffectMix => synth.set_effect_mix(value),
            }
        }
        outcome
    }
}

impl Default for ParameterGuard {
    fn default() -> Self {
        Self::new(Ceilings::default(), GuardPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::testing::{RecordingSynth, SynthCall};

    fn params() -> Parameters {
        Parameters {
            frequency: 440.0,
            amplitude: 0.5,
            ramp_time: 0.2,
            effect_mix: 0.0,
        }
    }

    #[test]
    fn test_within_ceiling_accepted() {
        let guard = ParameterGuard::default();
        assert_eq!(guard.apply(ParamKind::Frequency, 2000.0), GuardOutcome::Accepted(2000.0));
        assert_eq!(guard.apply(ParamKind::Amplitude, 0.25), GuardOutcome::Accepted(0.25));
    }

    #[test]
    fn test_reject_policy_keeps_previous() {
        let guard = ParameterGuard::new(Ceilings::default(), GuardPolicy::Reject);
        let mut params = params();
        let mut synth = RecordingSynth::default();

        let outcome = guard.apply_to(ParamKind::Frequency, 2500.0, &mut params, &mut synth);

        assert_eq!(
            outcome,
            GuardOutcome::Rejected {
                requested: 2500.0,
                ceiling: 2000.0
            }
        );
        assert_eq!(params.frequency, 440.0);
        assert!(synth.calls.is_empty());
    }

    #[test]
    fn test_clamp_policy_applies_ceiling() {
        let guard = ParameterGuard::new(Ceilings::default(), GuardPolicy::Clamp);
        let mut params = params();
        let mut synth = RecordingSynth::default();

        let outcome = guard.apply_to(ParamKind::Frequency, 2500.0, &mut params, &mut synth);

        assert_eq!(outcome, GuardOutcome::Clamped(2000.0));
        assert_eq!(params.frequency, 2000.0);
        assert_eq!(synth.calls, vec![SynthCall::Frequency(2000.0)]);
    }

    #[test]
    fn test_synth_never_sees_over_ceiling() {
        for policy in [GuardPolicy::Reject, GuardPolicy::Clamp] {
            let guard = ParameterGuard::new(Ceilings::default(), policy);
            let mut params = params();
            let mut synth = RecordingSynth::default();

            for requested in [10.0, 1999.9, 2000.0, 2000.1, 2500.0, 1.0e9] {
                guard.apply_to(ParamKind::Frequency, requested, &mut params, &mut synth);
            }

            assert!(synth.frequencies().iter().all(|&f| f <= 2000.0));
        }
    }

    #[test]
    fn test_negative_values_pass_through() {
        let guard = ParameterGuard::default();
        assert_eq!(guard.apply(ParamKind::RampTime, -0.1), GuardOutcome::Accepted(-0.1));
        assert_eq!(guard.apply(ParamKind::EffectMix, -0.3), GuardOutcome::Accepted(-0.3));
    }

    #[test]
    fn test_non_finite_always_rejected() {
        let guard = ParameterGuard::new(Ceilings::default(), GuardPolicy::Clamp);
        assert!(guard.apply(ParamKind::Amplitude, f64::NAN).applied().is_none());
        assert!(guard.apply(ParamKind::Amplitude, f64::INFINITY).applied().is_none());
    }

    #[test]
    fn test_custom_ceilings() {
        let ceilings = Ceilings {
            ramp_time: 2.0,
            ..Ceilings::default()
        };
        let guard = ParameterGuard::new(ceilings, GuardPolicy::Clamp);
        assert_eq!(guard.apply(ParamKind::RampTime, 3.0), GuardOutcome::Clamped(2.0));
    }
}
