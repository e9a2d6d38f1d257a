//! Data slot naming and document chunking.
//!
//! Slot 0 is named exactly after the base name. Slot `i > 0` is named
//! `"{base}_{i + 1}"`, so the second slot is `base_2`, the third `base_3`.
//! There is no `base_1`. Only names produced by [`SlotNaming::name`] are ever
//! recognised as slots.

/// Maps slot indexes to playlist names and back.
#[derive(Debug, Clone, Copy)]
pub struct SlotNaming<'a> {
    base: &'a str,
}

impl<'a> SlotNaming<'a> {
    pub fn new(base: &'a str) -> Self {
        Self { base }
    }

    pub fn name(&self, index: usize) -> String {
        if index == 0 {
            self.base.to_string()
        } else {
            format!("{}_{}", self.base, index + 1)
        }
    }

    /// Logical index of a slot name, `None` for anything that is not
    /// exactly a slot name (`baseExtra`, `base_1`, `base_02`, `base_x`).
    pub fn index_of(&self, name: &str) -> Option<usize> {
        let rest = name.strip_prefix(self.base)?;
        if rest.is_empty() {
            return Some(0);
        }

        let digits = rest.strip_prefix('_')?;
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let suffix: usize = digits.parse().ok()?;
        if suffix < 2 {
            return None;
        }
        Some(suffix - 1)
    }
}

/// Cuts `text` into consecutive pieces of at most `capacity` characters.
///
/// Counts characters, not bytes, so a multi-byte character is never split.
/// An empty text yields no pieces.
pub fn split_into_slots(text: &str, capacity: usize) -> Vec<String> {
    let capacity = capacity.max(1);
    let mut slots = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == capacity {
            slots.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() {
        slots.push(current);
    }
    slots
}
