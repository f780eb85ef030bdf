// Copyright 2026 recache Project Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shared components for recache.

/// Invariant assertion macros.
pub mod assert;
/// Key and value bounds.
pub mod code;
/// Error and result types shared by all recache crates.
pub mod error;
/// Slot arena with stable tokens.
pub mod slab;
