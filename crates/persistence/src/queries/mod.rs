// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic read queries.
//!
//! Every query takes the tenant and filters on it, so a row owned by another
//! tenant reads exactly like a missing one.

pub mod assignments;
pub mod audit;
pub mod records;
pub mod slots;
