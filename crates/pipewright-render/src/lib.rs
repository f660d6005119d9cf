// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Template rendering for pipewright.
//!
//! Rendering substitutes `${component-id.path}` references in a compiled
//! configuration template with values from a single batch item's
//! [`ItemCache`]. It is a pure function of `(template, cache)` and is the
//! only place where cross-item contamination could occur, so it is strictly
//! cache-scoped: no clock, no I/O, no shared mutable state.

mod cache;
mod error;
mod render;

pub use cache::ItemCache;
pub use error::RenderError;
pub use render::render;
