// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Command implementations.

pub mod inspect;
pub mod run;
pub mod translations;
