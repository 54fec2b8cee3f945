//! Emitting messages about instant events to the hosting UI layer.

use std::sync::{
    mpsc::{self, Sender},
    LazyLock, Mutex,
};

use derive_more::Deref;

use crate::prelude::*;

/// Interface for receiving game event messages for displaying.
pub enum Msg {
    /// Text message.
    Message(String),

    /// Entity died at the location.
    Death(Location),

    /// Autonomous control switched itself off.
    AutomatonStopped,
}

static RCV: LazyLock<Mutex<Option<Sender<Msg>>>> =
    LazyLock::new(Default::default);

#[derive(Deref)]
pub struct Receiver(mpsc::Receiver<Msg>);

impl Default for Receiver {
    fn default() -> Self {
        let (send, recv) = mpsc::channel();
        *RCV.lock().unwrap() = Some(send);
        Receiver(recv)
    }
}

pub fn send_msg(msg: Msg) {
    if let Some(ref mut sender) = *RCV.lock().unwrap() {
        // A send only fails when no receiver is listening, which is fine.
        let _ = sender.send(msg);
    }
}

#[macro_export]
macro_rules! msg {
    // NB. Even the simple case needs to be wrapped in `format!` in case the
    // fmt string is doing named variable capture.
    ($fmt:expr) => {
        $crate::send_msg($crate::Msg::Message(format!($fmt)))
    };

    ($fmt:expr, $($arg:expr),*) => {
        $crate::send_msg($crate::Msg::Message(format!($fmt, $($arg),*)))
    };
}
