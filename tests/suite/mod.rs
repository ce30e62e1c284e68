mod capability;
mod cli;
mod codec;
mod difficulty_gate;
mod dispatch;
