/// Code spans are raw zones: no other inline parsing happens inside them.
pub struct CodeSpan;

impl CodeSpan {
    pub const TICK: u8 = b'`';
}
