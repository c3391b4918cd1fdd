// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use tribune_core::utils::index::{TypedIndex, TypedIndexTag};

/// A tag type for integer variable handles.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VarIdTag;

impl TypedIndexTag for VarIdTag {
    const NAME: &'static str = "VarId";
}

/// A handle to an integer variable of a `CpModel`.
pub type VarId = TypedIndex<VarIdTag>;

/// A tag type for interval variable handles.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct IntervalIdTag;

impl TypedIndexTag for IntervalIdTag {
    const NAME: &'static str = "IntervalId";
}

/// A handle to an interval variable of a `CpModel`.
pub type IntervalId = TypedIndex<IntervalIdTag>;

/// A tag type for propagator indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PropagatorIndexTag;

impl TypedIndexTag for PropagatorIndexTag {
    const NAME: &'static str = "PropagatorIndex";
}

/// An index into the propagators of a `CpModel`.
pub type PropagatorIndex = TypedIndex<PropagatorIndexTag>;

/// A tag type for monitor indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MonitorIndexTag;

impl TypedIndexTag for MonitorIndexTag {
    const NAME: &'static str = "MonitorIndex";
}

/// An index into the monitors of a `CompositeMonitor`.
pub type MonitorIndex = TypedIndex<MonitorIndexTag>;
