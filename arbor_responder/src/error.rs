// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use arbor_tree::PassError;

/// Why an input event or frame could not be processed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// A draw or hit-test pass kept colliding with concurrent tree changes.
    #[error(transparent)]
    Pass(#[from] PassError),
}
