use crate::inst::Inst;

/// A compiled pattern: an ordered instruction stream, executed left to
/// right by [`crate::vm`].
pub struct Program {
    pub(crate) insts: Vec<Inst>,
}

impl Program {
    pub(crate) fn new(insts: Vec<Inst>) -> Program {
        Program { insts }
    }

    pub(crate) fn is_anchored_start(&self) -> bool {
        matches!(self.insts.first(), Some(Inst::AnchorStart))
    }
}
