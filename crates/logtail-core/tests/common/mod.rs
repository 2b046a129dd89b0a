// Copyright 2025-Present the logtail contributors
// SPDX-License-Identifier: Apache-2.0

pub mod mocks;
