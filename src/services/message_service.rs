use crate::{
    database::MessageStore,
    models::{Message, Mood},
    utils::AppError,
};
use rand::Rng;

pub const NO_MESSAGES_FALLBACK: &str = "이런, 지금은 드릴 메시지가 없네요.";
pub const RETRY_FALLBACK: &str = "메시지를 찾는 데 실패했어요. 다시 시도해주세요.";

#[derive(Debug, PartialEq)]
pub enum RandomMessage {
    Found(Message),
    /// Collection vazia
    Empty,
    /// Count e fetch divergiram (escrita concorrente)
    Vanished,
}

/// Offset uniforme em [0, count), ou None se a collection estiver vazia
pub fn pick_offset<R: Rng + ?Sized>(count: u64, rng: &mut R) -> Option<u64> {
    if count == 0 {
        return None;
    }
    Some(rng.gen_range(0..count))
}

/// Sorteia uma mensagem: count -> offset aleatório -> skip/limit(1)
pub async fn random_message(
    store: &dyn MessageStore,
    mood: Mood,
) -> Result<RandomMessage, AppError> {
    let count = store.count(mood).await?;

    let picked = pick_offset(count, &mut rand::thread_rng());
    let offset = match picked {
        Some(offset) => offset,
        None => return Ok(RandomMessage::Empty),
    };

    log::debug!("🎲 {} messages for mood '{}', picked offset {}", count, mood, offset);

    match store.nth(mood, offset).await? {
        Some(message) => Ok(RandomMessage::Found(message)),
        None => Ok(RandomMessage::Vanished),
    }
}
