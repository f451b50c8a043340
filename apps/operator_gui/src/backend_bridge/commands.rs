//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    ResetProcess,
    StartVideoStreams,
    StopVideoStreams,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::ResetProcess => "reset_process",
            BackendCommand::StartVideoStreams => "start_video_streams",
            BackendCommand::StopVideoStreams => "stop_video_streams",
        }
    }
}
