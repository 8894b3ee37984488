use log::trace;

use super::Runtime;
use crate::runner::ds::error::{CallResult, RtError};
use crate::runner::ds::method::MethodEntry;
use crate::runner::ds::value::{Proc, Value};

impl Runtime {
    /// The implementation `super` reaches from `current` running as `name`
    /// on `receiver`.
    ///
    /// The search starts after the first chain entity holding `current`
    /// (after the head when none does) and skips every entry sharing
    /// `current`'s body, so a donated copy never resolves to itself.
    pub fn find_super_method(
        &self,
        receiver: &Value,
        name: &str,
        current: &MethodEntry,
    ) -> Result<MethodEntry, RtError> {
        let chain = self.dispatch_chain(receiver);
        let start = chain
            .iter()
            .position(|id| {
                self.table_of(*id)
                    .get(name)
                    .map_or(false, |e| e.same_handler(current))
            })
            .map_or(1, |i| i + 1);

        for id in chain.iter().skip(start) {
            if let Some(entry) = self.table_of(*id).get(name) {
                if !entry.is_stub() && !entry.same_handler(current) {
                    return Ok(entry.clone());
                }
            }
        }

        Err(RtError::NoSuperMethod {
            name: name.to_string(),
            receiver: self.describe(receiver),
        })
    }

    /// `super(*args)` from the running method. Without an explicit block the
    /// running method's block is passed on.
    pub fn call_super(&mut self, args: Vec<Value>, block: Option<Proc>) -> CallResult {
        let frame = match self.current_frame() {
            Some(frame) => frame.clone(),
            None => {
                return Err(RtError::LocalJump("super called outside of method".to_string()).into())
            }
        };

        let entry = self.find_super_method(&frame.receiver, &frame.name, &frame.entry)?;
        trace!(
            "super {}#{} -> {}",
            self.entity_name(frame.entry.owner()),
            frame.name,
            self.entity_name(entry.owner())
        );
        self.invoke(entry, frame.receiver, args, block.or(frame.block))
    }
}
