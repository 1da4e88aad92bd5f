// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic writes.
//!
//! Assignment and slot-retirement writes are only called from inside a slot
//! transaction. Record registration exists for fixtures and tooling.

pub mod assignments;
pub mod audit;
pub mod records;
pub mod slots;
