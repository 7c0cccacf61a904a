//! # Cellular radio configuration.
//!
//! The modem itself is an external collaborator behind [`CellularModem`].
//! [`configure_radio`] brings it to a [`RadioTarget`] without touching
//! settings that already match:
//!
//! ```text
//! profile == target?  yes ─► skip
//!                     no  ─► set profile ─► reboot if the modem asks for it
//! rat == target?      yes ─► skip
//!                     no  ─► set rat     ─► reboot if the modem asks for it
//! ```
//!
//! The RAT step runs only after the profile step succeeded.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

/// Radio access technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rat {
    Gsm,
    Lte,
    CatM1,
    NbIot,
}

impl Rat {
    pub fn as_label(&self) -> &'static str {
        match self {
            Rat::Gsm => "gsm",
            Rat::Lte => "lte",
            Rat::CatM1 => "cat_m1",
            Rat::NbIot => "nb_iot",
        }
    }
}

impl fmt::Display for Rat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Failure reported by the modem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModemError {
    /// A query or write command was rejected.
    #[error("modem command {op} failed (code {code})")]
    Command { op: &'static str, code: i32 },

    /// The module did not come back from a reboot.
    #[error("modem reboot failed (code {code})")]
    Reboot { code: i32 },
}

impl ModemError {
    pub fn as_label(&self) -> &'static str {
        match self {
            ModemError::Command { .. } => "modem_command",
            ModemError::Reboot { .. } => "modem_reboot",
        }
    }

    /// Signed code reported by the modem.
    pub fn code(&self) -> i32 {
        match self {
            ModemError::Command { code, .. } | ModemError::Reboot { code } => *code,
        }
    }
}

/// Configuration surface of the cellular module.
#[async_trait]
pub trait CellularModem: Send + Sync {
    async fn mno_profile(&self) -> Result<i32, ModemError>;
    async fn set_mno_profile(&self, profile: i32) -> Result<(), ModemError>;

    /// Highest-ranked radio access technology.
    async fn rat(&self) -> Result<Rat, ModemError>;
    async fn set_rat(&self, rat: Rat) -> Result<(), ModemError>;

    /// True when persisted settings changed and only take effect after a reboot.
    async fn reboot_required(&self) -> bool;
    async fn reboot(&self) -> Result<(), ModemError>;
}

/// Desired radio settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioTarget {
    pub mno_profile: i32,
    pub rat: Rat,
}

/// What [`configure_radio`] actually changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadioChanges {
    pub profile_written: bool,
    pub rat_written: bool,
    pub reboots: u32,
}

impl RadioChanges {
    pub fn is_unchanged(&self) -> bool {
        *self == Self::default()
    }
}

/// Brings the modem to `target`, writing and rebooting only where needed.
pub async fn configure_radio(
    modem: &dyn CellularModem,
    target: &RadioTarget,
) -> Result<RadioChanges, ModemError> {
    info!(profile = target.mno_profile, rat = %target.rat, "configuring the cellular module");
    let mut changes = RadioChanges::default();

    if modem.mno_profile().await? != target.mno_profile {
        modem
            .set_mno_profile(target.mno_profile)
            .await
            .inspect_err(|e| error!(profile = target.mno_profile, error = %e, "failed to set MNO profile"))?;
        changes.profile_written = true;
        changes.reboots += reboot_if_required(modem).await?;
    }

    if modem.rat().await? != target.rat {
        modem
            .set_rat(target.rat)
            .await
            .inspect_err(|e| error!(rat = %target.rat, error = %e, "failed to set RAT"))?;
        changes.rat_written = true;
        changes.reboots += reboot_if_required(modem).await?;
    }

    Ok(changes)
}

async fn reboot_if_required(modem: &dyn CellularModem) -> Result<u32, ModemError> {
    if !modem.reboot_required().await {
        return Ok(0);
    }
    info!("rebooting the module as its settings have changed");
    modem.reboot().await?;
    Ok(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeModem {
        profile: Mutex<i32>,
        rat: Mutex<Option<Rat>>,
        dirty: Mutex<bool>,
        calls: Mutex<Vec<&'static str>>,
        reject_profile: bool,
    }

    impl FakeModem {
        fn with(profile: i32, rat: Rat) -> Self {
            Self {
                profile: Mutex::new(profile),
                rat: Mutex::new(Some(rat)),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl CellularModem for FakeModem {
        async fn mno_profile(&self) -> Result<i32, ModemError> {
            Ok(*self.profile.lock().unwrap())
        }

        async fn set_mno_profile(&self, profile: i32) -> Result<(), ModemError> {
            self.record("set_mno_profile");
            if self.reject_profile {
                return Err(ModemError::Command {
                    op: "set_mno_profile",
                    code: -4,
                });
            }
            *self.profile.lock().unwrap() = profile;
            *self.dirty.lock().unwrap() = true;
            Ok(())
        }

        async fn rat(&self) -> Result<Rat, ModemError> {
            self.rat.lock().unwrap().ok_or(ModemError::Command { op: "rat", code: -1 })
        }

        async fn set_rat(&self, rat: Rat) -> Result<(), ModemError> {
            self.record("set_rat");
            *self.rat.lock().unwrap() = Some(rat);
            *self.dirty.lock().unwrap() = true;
            Ok(())
        }

        async fn reboot_required(&self) -> bool {
            *self.dirty.lock().unwrap()
        }

        async fn reboot(&self) -> Result<(), ModemError> {
            self.record("reboot");
            *self.dirty.lock().unwrap() = false;
            Ok(())
        }
    }

    const TARGET: RadioTarget = RadioTarget {
        mno_profile: 100,
        rat: Rat::CatM1,
    };

    #[tokio::test]
    async fn matching_modem_is_left_alone() {
        let modem = FakeModem::with(100, Rat::CatM1);
        let changes = configure_radio(&modem, &TARGET).await.unwrap();
        assert!(changes.is_unchanged());
        assert!(modem.calls().is_empty());
    }

    #[tokio::test]
    async fn differing_settings_are_written_then_rebooted() {
        let modem = FakeModem::with(90, Rat::NbIot);
        let changes = configure_radio(&modem, &TARGET).await.unwrap();

        assert_eq!(
            changes,
            RadioChanges {
                profile_written: true,
                rat_written: true,
                reboots: 2,
            }
        );
        assert_eq!(
            modem.calls(),
            vec!["set_mno_profile", "reboot", "set_rat", "reboot"]
        );
    }

    #[tokio::test]
    async fn only_rat_differs() {
        let modem = FakeModem::with(100, Rat::Lte);
        let changes = configure_radio(&modem, &TARGET).await.unwrap();
        assert!(!changes.profile_written);
        assert!(changes.rat_written);
        assert_eq!(modem.calls(), vec!["set_rat", "reboot"]);
    }

    #[tokio::test]
    async fn profile_failure_skips_rat() {
        let modem = FakeModem {
            reject_profile: true,
            ..FakeModem::with(1, Rat::Lte)
        };
        let err = configure_radio(&modem, &TARGET).await.unwrap_err();
        assert_eq!(err.code(), -4);
        assert_eq!(err.as_label(), "modem_command");
        assert_eq!(modem.calls(), vec!["set_mno_profile"]);
    }
}
