//! Access-mode sets.
//!
//! [`AccessModes`] is the WAC vocabulary (`read`, `append`, `write`,
//! `control`); ACP policies use its first three bits. [`NormalizedAccess`]
//! is the vocabulary exposed to callers, which splits `control` into
//! reading and writing access-control metadata.
//!
//! Every set handed back to a caller satisfies `write ⇒ append`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vocab::acl;

// ============================================================================
// Mode
// ============================================================================

/// A single access mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// `acl:Read`
    Read,
    /// `acl:Append`
    Append,
    /// `acl:Write`
    Write,
    /// `acl:Control`
    Control,
}

impl Mode {
    /// All modes, in canonical order.
    pub const ALL: [Mode; 4] = [Mode::Read, Mode::Append, Mode::Write, Mode::Control];

    /// The `acl:` IRI for this mode.
    pub fn iri(self) -> &'static str {
        match self {
            Self::Read => acl::READ,
            Self::Append => acl::APPEND,
            Self::Write => acl::WRITE,
            Self::Control => acl::CONTROL,
        }
    }

    /// Parse an `acl:` mode IRI.
    pub fn from_iri(iri: &str) -> Option<Self> {
        match iri {
            acl::READ => Some(Self::Read),
            acl::APPEND => Some(Self::Append),
            acl::WRITE => Some(Self::Write),
            acl::CONTROL => Some(Self::Control),
            _ => None,
        }
    }

    /// The keyword used in `WAC-Allow` headers.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Append => "append",
            Self::Write => "write",
            Self::Control => "control",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// ============================================================================
// AccessModes
// ============================================================================

/// Access modes in the WAC vocabulary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessModes {
    /// Read the resource.
    pub read: bool,
    /// Add data to the resource.
    pub append: bool,
    /// Change or delete the resource.
    pub write: bool,
    /// Read and change the resource's access-control document.
    pub control: bool,
}

impl AccessModes {
    /// No access.
    pub const NONE: AccessModes = AccessModes {
        read: false,
        append: false,
        write: false,
        control: false,
    };

    /// Every mode.
    pub const ALL: AccessModes = AccessModes {
        read: true,
        append: true,
        write: true,
        control: true,
    };

    /// Read-only access.
    pub const READ: AccessModes = AccessModes {
        read: true,
        append: false,
        write: false,
        control: false,
    };

    /// Whether `mode` is granted.
    pub fn has(&self, mode: Mode) -> bool {
        match mode {
            Mode::Read => self.read,
            Mode::Append => self.append,
            Mode::Write => self.write,
            Mode::Control => self.control,
        }
    }

    /// Grant or withdraw a single mode.
    pub fn set(&mut self, mode: Mode, value: bool) {
        match mode {
            Mode::Read => self.read = value,
            Mode::Append => self.append = value,
            Mode::Write => self.write = value,
            Mode::Control => self.control = value,
        }
    }

    /// Apply `write ⇒ append`.
    pub fn normalized(self) -> Self {
        Self {
            append: self.append || self.write,
            ..self
        }
    }

    /// Bitwise union.
    pub fn union(self, other: Self) -> Self {
        Self {
            read: self.read || other.read,
            append: self.append || other.append,
            write: self.write || other.write,
            control: self.control || other.control,
        }
    }

    /// Remove the modes in `denied`.
    ///
    /// `allowed` is normalized first so a denied `write` leaves an implied
    /// `append` in place, and a denied `append` also takes `write` away
    /// since `write` subsumes it.
    pub fn without(self, denied: Self) -> Self {
        let allowed = self.normalized();
        let append = allowed.append && !denied.append;
        Self {
            read: allowed.read && !denied.read,
            append,
            write: allowed.write && !denied.write && append,
            control: allowed.control && !denied.control,
        }
    }

    /// Whether no mode is granted.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// The granted modes, in canonical order.
    pub fn modes(&self) -> impl Iterator<Item = Mode> + '_ {
        Mode::ALL.into_iter().filter(|m| self.has(*m))
    }

    /// Collect modes from `acl:` IRIs, ignoring unknown ones.
    pub fn from_iris<'a>(iris: impl IntoIterator<Item = &'a str>) -> Self {
        let mut modes = Self::NONE;
        for iri in iris {
            match Mode::from_iri(iri) {
                Some(mode) => modes.set(mode, true),
                None => log::warn!("Ignoring unknown access mode <{iri}>"),
            }
        }
        modes
    }
}

impl FromIterator<Mode> for AccessModes {
    fn from_iter<I: IntoIterator<Item = Mode>>(iter: I) -> Self {
        let mut modes = Self::NONE;
        for mode in iter {
            modes.set(mode, true);
        }
        modes
    }
}

impl fmt::Display for AccessModes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<&str> = self.modes().map(Mode::keyword).collect();
        write!(f, "{{{}}}", words.join(", "))
    }
}

// ============================================================================
// NormalizedAccess
// ============================================================================

/// Access in the scheme-independent vocabulary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAccess {
    /// Read the resource.
    pub read: bool,
    /// Add data to the resource.
    pub append: bool,
    /// Change or delete the resource.
    pub write: bool,
    /// Read the resource's access-control metadata.
    pub control_read: bool,
    /// Change the resource's access-control metadata.
    pub control_write: bool,
}

impl NormalizedAccess {
    /// No access.
    pub const NONE: NormalizedAccess = NormalizedAccess {
        read: false,
        append: false,
        write: false,
        control_read: false,
        control_write: false,
    };

    /// Apply `write ⇒ append`.
    pub fn normalized(self) -> Self {
        Self {
            append: self.append || self.write,
            ..self
        }
    }

    /// Combine resource modes with separately evaluated control modes.
    pub fn from_parts(resource: AccessModes, control: AccessModes) -> Self {
        let resource = resource.normalized();
        Self {
            read: resource.read,
            append: resource.append,
            write: resource.write,
            control_read: control.read,
            control_write: control.write,
        }
    }

    /// The resource-level modes (`read`, `append`, `write`).
    pub fn resource_modes(&self) -> AccessModes {
        AccessModes {
            read: self.read,
            append: self.append,
            write: self.write,
            control: false,
        }
    }

    /// Express this access in the WAC vocabulary.
    ///
    /// WAC has a single `control` mode, so the two control bits must agree.
    pub fn to_wac(&self, resource: &str) -> Result<AccessModes> {
        if self.control_read != self.control_write {
            return Err(Error::ControlModeMismatch {
                resource: resource.to_string(),
                control_read: self.control_read,
                control_write: self.control_write,
            });
        }
        Ok(AccessModes {
            read: self.read,
            append: self.append,
            write: self.write,
            control: self.control_read,
        }
        .normalized())
    }

    /// Whether nothing is granted.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl From<AccessModes> for NormalizedAccess {
    /// WAC `control` grants both reading and writing control metadata.
    fn from(modes: AccessModes) -> Self {
        let modes = modes.normalized();
        Self {
            read: modes.read,
            append: modes.append,
            write: modes.write,
            control_read: modes.control,
            control_write: modes.control,
        }
    }
}

impl fmt::Display for NormalizedAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words = Vec::new();
        for (on, word) in [
            (self.read, "read"),
            (self.append, "append"),
            (self.write, "write"),
            (self.control_read, "controlRead"),
            (self.control_write, "controlWrite"),
        ] {
            if on {
                words.push(word);
            }
        }
        write!(f, "{{{}}}", words.join(", "))
    }
}

// ============================================================================
// AccessScope
// ============================================================================

/// Which part of the access state an operation reads or changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessScope {
    /// Access to the resource itself.
    Resource,
    /// Access inherited by the members of a container.
    Default,
}
