/*
 *  display/mod.rs
 *
 *  dotgrid - packed canvases for daisy-chained LED matrices
 *  (c) 2024-26 the dotgrid authors
 *
 *  Logical dot-matrix display surface
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

//! A logical dot-matrix display, modelled as an observable surface of
//! bits: 1 is a lit pixel, 0 is unlit. Drawing happens on a [`Canvas`];
//! changes are pushed to observers (typically a hardware viewport) as
//! immutable snapshots.

pub mod canvas;

pub use canvas::{Canvas, ObserverId, Snapshot, UpdateGuard};
