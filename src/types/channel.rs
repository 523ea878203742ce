use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Message group holding the primary GPS fixes
pub const GPS_GROUP: &str = "GPS";
/// Auxiliary GPS accuracy group, carries the vertical velocity accuracy `VV`
pub const GPA_GROUP: &str = "GPA";
/// Raw receiver header group, carries the receiver's leap second count
pub const GRXH_GROUP: &str = "GRXH";

/// A single logged numeric value
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int(v) => v as f64,
            Value::Float(v) => v,
        }
    }

    /// Returns the value as an unsigned integer if it is non-negative and integral
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Int(v) => u64::try_from(v).ok(),
            Value::Float(v) => {
                if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 {
                    Some(v as u64)
                } else {
                    None
                }
            }
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

/// One logged field: (sample index, value) pairs in log order
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Channel {
    pub samples: Vec<(usize, Value)>,
}

impl Channel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize, value: Value) {
        debug_assert!(
            self.samples.last().map_or(true, |(last, _)| *last <= index),
            "sample indices must be non-decreasing"
        );
        self.samples.push((index, value));
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.samples.iter().map(|(_, v)| v)
    }

    /// Largest value in the channel, `None` when empty
    pub fn max(&self) -> Option<f64> {
        self.values()
            .map(Value::as_f64)
            .fold(None, |acc, v| match acc {
                Some(m) if m >= v => Some(m),
                _ => Some(v),
            })
    }

    pub fn last(&self) -> Option<&Value> {
        self.samples.last().map(|(_, v)| v)
    }
}

impl<I: Into<Value>> FromIterator<I> for Channel {
    /// Builds a channel with sequential sample indices starting at 0
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self {
            samples: iter
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i, v.into()))
                .collect(),
        }
    }
}

/// All fields of one message type, keyed by field name
pub type ChannelGroup = BTreeMap<String, Channel>;

/// Every message group of a log, keyed by message name
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelSet {
    pub groups: BTreeMap<String, ChannelGroup>,
}

impl ChannelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn group(&self, name: &str) -> Option<&ChannelGroup> {
        self.groups.get(name)
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    pub fn channel(&self, group: &str, field: &str) -> Option<&Channel> {
        self.groups.get(group)?.get(field)
    }

    /// Add or replace a channel, creating the group if needed
    pub fn insert_channel(&mut self, group: &str, field: &str, channel: Channel) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(field.to_string(), channel);
    }

    pub fn channel_mut(&mut self, group: &str, field: &str) -> &mut Channel {
        self.groups
            .entry(group.to_string())
            .or_default()
            .entry(field.to_string())
            .or_default()
    }

    /// Total number of samples in a group, taken from its longest channel
    pub fn sample_count(&self, group: &str) -> usize {
        self.group(group)
            .map(|g| g.values().map(Channel::len).max().unwrap_or(0))
            .unwrap_or(0)
    }
}
