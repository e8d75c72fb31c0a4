//! Opcode statistics strategy
//!
//! [`OpcodeCounter`] is a terminal reader that counts how often each opcode
//! occurs, plus the operand values of a few hot instructions: `i32.const`
//! values, local indices and the `(align, offset)` pairs of `i32.load` /
//! `i32.store`.
//!
//! The operand tables are scanned linearly on every hit. That is fine for the
//! handful of distinct values real modules produce per table, but grows
//! quadratically for adversarial inputs.

use core::fmt;

use wbr_error::Result;
use wbr_format::{
    BinaryReader,
    Opcode,
    ReaderState,
};

/// Count for one integer key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntCounter {
    /// The key
    pub value: i64,
    /// How often it was seen
    pub count: u64,
}

impl IntCounter {
    /// Create a counter for `value`
    pub const fn new(value: i64, count: u64) -> Self {
        Self { value, count }
    }
}

/// Count for a pair of integer keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntPairCounter {
    /// First key
    pub first:  i64,
    /// Second key
    pub second: i64,
    /// How often the pair was seen
    pub count:  u64,
}

impl IntPairCounter {
    /// Create a counter for `(first, second)`
    pub const fn new(first: i64, second: i64, count: u64) -> Self {
        Self { first, second, count }
    }
}

/// Everything counted during one walk
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpcntData {
    /// Dense table indexed by opcode code; `opcode_vec[i].value == i`
    pub opcode_vec:    Vec<IntCounter>,
    /// `i32.const` values, keyed as signed 32-bit integers
    pub i32_const_vec: Vec<IntCounter>,
    /// `get_local` indices
    pub get_local_vec: Vec<IntCounter>,
    /// `set_local` indices
    pub set_local_vec: Vec<IntCounter>,
    /// `tee_local` indices
    pub tee_local_vec: Vec<IntCounter>,
    /// `i32.load` as `(align_log2, offset)`
    pub i32_load_vec:  Vec<IntPairCounter>,
    /// `i32.store` as `(align_log2, offset)`
    pub i32_store_vec: Vec<IntPairCounter>,
}

fn increment(vec: &mut Vec<IntCounter>, value: i64) {
    match vec.iter_mut().find(|counter| counter.value == value) {
        Some(counter) => counter.count += 1,
        None => vec.push(IntCounter::new(value, 1)),
    }
}

fn increment_pair(vec: &mut Vec<IntPairCounter>, first: i64, second: i64) {
    match vec
        .iter_mut()
        .find(|counter| counter.first == first && counter.second == second)
    {
        Some(counter) => counter.count += 1,
        None => vec.push(IntPairCounter::new(first, second, 1)),
    }
}

fn sorted(vec: &[IntCounter], cutoff: u64) -> Vec<IntCounter> {
    let mut entries: Vec<IntCounter> = vec
        .iter()
        .copied()
        .filter(|counter| counter.count > 0 && counter.count >= cutoff)
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then(a.value.cmp(&b.value)));
    entries
}

fn sorted_pairs(vec: &[IntPairCounter], cutoff: u64) -> Vec<IntPairCounter> {
    let mut entries: Vec<IntPairCounter> = vec
        .iter()
        .copied()
        .filter(|counter| counter.count > 0 && counter.count >= cutoff)
        .collect();
    entries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.first.cmp(&b.first))
            .then(a.second.cmp(&b.second))
    });
    entries
}

impl OpcntData {
    /// Count recorded for `opcode`
    pub fn opcode_count(&self, opcode: Opcode) -> u64 {
        usize::try_from(opcode.code())
            .ok()
            .and_then(|index| self.opcode_vec.get(index))
            .map_or(0, |counter| counter.count)
    }

    /// Total number of opcodes seen
    pub fn total_opcodes(&self) -> u64 {
        self.opcode_vec.iter().map(|counter| counter.count).sum()
    }

    /// Write a report of every table, most frequent first.
    ///
    /// Entries seen fewer than `cutoff` times are left out.
    pub fn write_report<W: fmt::Write>(&self, out: &mut W, cutoff: u64) -> Result<()> {
        writeln!(out, "Opcode counts:")?;
        for counter in sorted(&self.opcode_vec, cutoff) {
            let name = u32::try_from(counter.value)
                .ok()
                .and_then(Opcode::from_code)
                .map_or_else(|| format!("<0x{:x}>", counter.value), |op| op.name().to_string());
            writeln!(out, "{name}: {}", counter.count)?;
        }

        let tables = [
            ("i32.const", &self.i32_const_vec),
            ("get_local", &self.get_local_vec),
            ("set_local", &self.set_local_vec),
            ("tee_local", &self.tee_local_vec),
        ];
        for (name, vec) in tables {
            writeln!(out)?;
            writeln!(out, "{name}:")?;
            for counter in sorted(vec, cutoff) {
                writeln!(out, "{name} {}: {}", counter.value, counter.count)?;
            }
        }

        for (name, vec) in [("i32.load", &self.i32_load_vec), ("i32.store", &self.i32_store_vec)] {
            writeln!(out)?;
            writeln!(out, "{name}:")?;
            for counter in sorted_pairs(vec, cutoff) {
                writeln!(
                    out,
                    "{name} align={} offset={}: {}",
                    counter.first, counter.second, counter.count
                )?;
            }
        }
        Ok(())
    }
}

/// A terminal reader that fills an [`OpcntData`]
#[derive(Debug, Default)]
pub struct OpcodeCounter {
    data: OpcntData,
}

impl OpcodeCounter {
    /// Create a counter with empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// The tables counted so far
    pub fn data(&self) -> &OpcntData {
        &self.data
    }

    /// Consume the counter, returning its tables
    pub fn into_data(self) -> OpcntData {
        self.data
    }
}

impl BinaryReader for OpcodeCounter {
    fn on_opcode(&mut self, _state: &ReaderState<'_>, opcode: Opcode) -> Result<()> {
        let index = opcode.code() as usize;
        let table = &mut self.data.opcode_vec;
        if table.len() <= index {
            let start = table.len();
            table.extend((start..=index).map(|value| IntCounter::new(value as i64, 0)));
        }
        table[index].count += 1;
        Ok(())
    }

    fn on_i32_const_expr(&mut self, _state: &ReaderState<'_>, value: u32) -> Result<()> {
        increment(&mut self.data.i32_const_vec, i64::from(value as i32));
        Ok(())
    }

    fn on_get_local_expr(&mut self, _state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        increment(&mut self.data.get_local_vec, i64::from(local_index));
        Ok(())
    }

    fn on_set_local_expr(&mut self, _state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        increment(&mut self.data.set_local_vec, i64::from(local_index));
        Ok(())
    }

    fn on_tee_local_expr(&mut self, _state: &ReaderState<'_>, local_index: u32) -> Result<()> {
        increment(&mut self.data.tee_local_vec, i64::from(local_index));
        Ok(())
    }

    fn on_load_expr(&mut self, _state: &ReaderState<'_>, opcode: Opcode, align_log2: u32, offset: u32) -> Result<()> {
        if opcode == Opcode::I32Load {
            increment_pair(&mut self.data.i32_load_vec, i64::from(align_log2), i64::from(offset));
        }
        Ok(())
    }

    fn on_store_expr(&mut self, _state: &ReaderState<'_>, opcode: Opcode, align_log2: u32, offset: u32) -> Result<()> {
        if opcode == Opcode::I32Store {
            increment_pair(&mut self.data.i32_store_vec, i64::from(align_log2), i64::from(offset));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn state() -> ReaderState<'static> {
        ReaderState::new(&[], 0)
    }

    #[test]
    fn test_opcode_table_is_dense() {
        let mut counter = OpcodeCounter::new();
        counter.on_opcode(&state(), Opcode::I32Add).unwrap();
        counter.on_opcode(&state(), Opcode::Nop).unwrap();
        counter.on_opcode(&state(), Opcode::I32Add).unwrap();

        let data = counter.into_data();
        assert_eq!(data.opcode_vec.len(), 0x6a + 1);
        assert!(data.opcode_vec.iter().enumerate().all(|(i, c)| c.value == i as i64));
        assert_eq!(data.opcode_count(Opcode::I32Add), 2);
        assert_eq!(data.opcode_count(Opcode::Nop), 1);
        assert_eq!(data.opcode_count(Opcode::Drop), 0);
        assert_eq!(data.opcode_count(Opcode::F64Add), 0);
        assert_eq!(data.total_opcodes(), 3);
    }

    #[test]
    fn test_i32_const_is_keyed_signed() {
        let mut counter = OpcodeCounter::new();
        counter.on_i32_const_expr(&state(), u32::MAX).unwrap();
        counter.on_i32_const_expr(&state(), u32::MAX).unwrap();
        counter.on_i32_const_expr(&state(), 7).unwrap();

        assert_eq!(
            counter.data().i32_const_vec,
            vec![IntCounter::new(-1, 2), IntCounter::new(7, 1)]
        );
    }

    #[test]
    fn test_only_i32_memory_ops_are_paired() {
        let mut counter = OpcodeCounter::new();
        counter.on_load_expr(&state(), Opcode::I32Load, 2, 0).unwrap();
        counter.on_load_expr(&state(), Opcode::I64Load, 3, 0).unwrap();
        counter.on_store_expr(&state(), Opcode::I32Store, 2, 16).unwrap();
        counter.on_store_expr(&state(), Opcode::I32Store8, 0, 16).unwrap();

        let data = counter.into_data();
        assert_eq!(data.i32_load_vec, vec![IntPairCounter::new(2, 0, 1)]);
        assert_eq!(data.i32_store_vec, vec![IntPairCounter::new(2, 16, 1)]);
    }

    #[test]
    fn test_report_orders_by_count_then_key() {
        let mut counter = OpcodeCounter::new();
        for local in [3, 1, 3, 2, 1, 3] {
            counter.on_get_local_expr(&state(), local).unwrap();
        }
        let mut report = String::new();
        counter.data().write_report(&mut report, 0).unwrap();

        assert!(report.contains("get_local:\nget_local 3: 3\nget_local 1: 2\nget_local 2: 1\n"));
    }

    #[test]
    fn test_report_cutoff() {
        let mut counter = OpcodeCounter::new();
        for local in [3, 1, 3] {
            counter.on_set_local_expr(&state(), local).unwrap();
        }
        let mut report = String::new();
        counter.data().write_report(&mut report, 2).unwrap();

        assert!(report.contains("set_local:\nset_local 3: 2\n\n"));
        assert!(!report.contains("set_local 1"));
    }
}
