use flume::Receiver;
use replay::interfaces::gui_interface::{LoadMessage, LoadedData};

#[derive(Debug)]
pub struct LoadInterface {
    pub rx: Receiver<LoadMessage>,
    pub progress: String,
    pub error: Option<String>,
}

impl LoadInterface {
    pub fn new(rx: Receiver<LoadMessage>) -> LoadInterface {
        LoadInterface {
            rx,
            progress: String::from("Loading…"),
            error: None,
        }
    }

    /// update drains all messages currently in the channel and returns the loaded data once it
    /// arrives. Progress and error messages are kept for display in the GUI.
    pub fn update(&mut self) -> Option<Box<LoadedData>> {
        let mut loaded = None;

        while let Ok(message) = self.rx.try_recv() {
            match message {
                LoadMessage::Progress(progress) => self.progress = progress,
                LoadMessage::Ready(data) => loaded = Some(data),
                LoadMessage::Failed(error) => self.error = Some(error),
            }
        }

        loaded
    }
}
