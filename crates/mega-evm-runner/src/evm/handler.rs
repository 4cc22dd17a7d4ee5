use revm::{
    context::{result::HaltReason, ContextTr},
    context_interface::JournalTr,
    handler::{EvmTr, EvmTrError, FrameResult, FrameTr, Handler, MainnetHandler},
    interpreter::interpreter_action::{FrameInit, FrameInput},
    state::EvmState,
};

/// A mainnet handler whose top-level call frame is static.
///
/// Any state-changing opcode executed under it halts with
/// [`HaltReason::StateChangeDuringStaticCall`](revm::context::result::HaltReason), exactly as in
/// a nested `STATICCALL`. Every other stage is the mainnet one.
pub struct StaticCallHandler<EVM, ERROR, FRAME> {
    inner: MainnetHandler<EVM, ERROR, FRAME>,
}

impl<EVM, ERROR, FRAME> core::fmt::Debug for StaticCallHandler<EVM, ERROR, FRAME> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StaticCallHandler").finish_non_exhaustive()
    }
}

impl<EVM, ERROR, FRAME> Default for StaticCallHandler<EVM, ERROR, FRAME> {
    fn default() -> Self {
        Self { inner: MainnetHandler::default() }
    }
}

impl<EVM, ERROR, FRAME> Handler for StaticCallHandler<EVM, ERROR, FRAME>
where
    EVM: EvmTr<Context: ContextTr<Journal: JournalTr<State = EvmState>>, Frame = FRAME>,
    ERROR: EvmTrError<EVM>,
    FRAME: FrameTr<FrameResult = FrameResult, FrameInit = FrameInit>,
{
    type Evm = EVM;
    type Error = ERROR;
    type HaltReason = HaltReason;

    fn first_frame_input(
        &mut self,
        evm: &mut Self::Evm,
        gas_limit: u64,
    ) -> Result<FrameInit, Self::Error> {
        let mut frame_init = self.inner.first_frame_input(evm, gas_limit)?;
        if let FrameInput::Call(inputs) = &mut frame_init.frame_input {
            inputs.is_static = true;
        }
        Ok(frame_init)
    }
}
