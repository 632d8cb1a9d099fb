//! ストア変更通知
//!
//! 書き込み側と表示側が互いを知らなくてよいように、変更はブロードキャストで流す。
//! 購読は `subscribe()`、購読解除は受信側をdropするだけ。

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 16;

/// ストアが発行するイベント（ペイロードなし）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    InspectionsUpdated,
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::InspectionsUpdated => "fod-inspect:inspections-updated",
        }
    }
}

/// 変更通知チャネル
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<StoreEvent>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// イベントを送信し、受け取った購読者数を返す（購読者なしは0）
    pub fn notify(&self, event: StoreEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(_) => 0,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
