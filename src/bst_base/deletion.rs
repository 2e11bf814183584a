use bitmask_enum::bitmask;

#[bitmask(u8)]
pub enum RemovalFlags {
    Ok = 0,
    NotFound = 1,
    PromotedSuccessor = 2,
}

/// Outcome of one recursive removal pass, bubbled back up the descent.
pub struct Removal<V> {
    pub flags: RemovalFlags,
    pub value: Option<V>,
}

impl<V> Removal<V> {
    pub fn new(flags: RemovalFlags) -> Self {
        Self { flags, value: None }
    }

    pub fn with_value(flags: RemovalFlags, value: V) -> Self {
        Self {
            flags,
            value: Some(value),
        }
    }

    pub fn has(&self, flag: RemovalFlags) -> bool {
        self.flags.contains(flag)
    }
}
