use crate::simulation::progression::PlayerState;

/// Credit one manual mine action: the whole per-click yield, once.
pub fn mine(state: PlayerState) -> PlayerState {
    PlayerState {
        blocks: state.blocks + state.bpc,
        ..state
    }
}

/// Credit one passive accrual tick. Each call is a single discrete credit;
/// cadence is entirely up to the caller.
pub fn passive_tick(state: PlayerState) -> PlayerState {
    if state.bps == 0 {
        return state;
    }
    PlayerState {
        blocks: state.blocks + state.bps,
        ..state
    }
}
