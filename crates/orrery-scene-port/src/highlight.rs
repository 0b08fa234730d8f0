// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::types::ObjectKey;

/// Card under the pointer, if it is one the renderer should lift.
///
/// The composer only names a billboard that is interactive in the current
/// frame, so a renderer can apply the lift without re-checking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HighlightState {
    /// Lifted billboard.
    pub hovered: Option<ObjectKey>,
}

impl HighlightState {
    /// Whether `key` is the lifted billboard.
    pub fn is_hovered(&self, key: ObjectKey) -> bool {
        self.hovered == Some(key)
    }
}
