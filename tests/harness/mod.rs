// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for submission abuse simulation.
//!
//! Payload corpora and request generators shared by the security tests.

pub mod generators;
