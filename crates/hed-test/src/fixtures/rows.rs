// HED Tools - Hierarchical Event Descriptor validation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Annotated event rows: `(row index, onset time in seconds, HED string)`.

pub type Row = (usize, f64, &'static str);

/// Definitions used by the row fixtures.
pub const DEFINITIONS: &str = "(Definition/Stim, (Sensory-event, Red)), \
(Definition/Response, (Agent-action, Human-agent)), \
(Definition/Move/#, (Distance/#, Car))";

/// An onset followed by its offset.
pub fn onset_offset() -> Vec<Row> {
    vec![
        (0, 0.0, "(Onset, Def/Stim)"),
        (1, 1.5, "(Offset, Def/Stim)"),
    ]
}

/// Two overlapping events, an inset, and a duration-bounded one.
pub fn interleaved() -> Vec<Row> {
    vec![
        (0, 0.0, "(Onset, Def/Stim, (Purple))"),
        (1, 0.5, "(Onset, Def/Move/3 m)"),
        (2, 0.75, "(Inset, Def/Stim, (Boat))"),
        (3, 1.0, "(Offset, Def/Stim)"),
        (4, 2.0, "(Duration/250 ms, Def/Response)"),
        (5, 3.0, "(Offset, Def/Move/3 m)"),
    ]
}

/// An onset never closed before the end of the document.
pub fn unmatched() -> Vec<Row> {
    vec![(0, 0.0, "(Onset, Def/Stim)"), (1, 1.0, "Sensory-event")]
}
