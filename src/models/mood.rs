use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Humor binário: define a collection de mensagens e a voz da síntese
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Good,
    Bad,
}

impl Mood {
    pub fn collection_name(self) -> &'static str {
        match self {
            Mood::Good => "emotion_good",
            Mood::Bad => "emotion_bad",
        }
    }

    pub fn voice_name(self) -> &'static str {
        match self {
            Mood::Good => "ko-KR-InJoonNeural",
            Mood::Bad => "ko-KR-SunHiNeural",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Good => "good",
            Mood::Bad => "bad",
        }
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Mood::Good),
            "bad" => Ok(Mood::Bad),
            other => Err(format!("Invalid mood: {}", other)),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_exact() {
        assert_eq!("good".parse::<Mood>().unwrap(), Mood::Good);
        assert_eq!("bad".parse::<Mood>().unwrap(), Mood::Bad);
        assert!("Good".parse::<Mood>().is_err());
        assert!("".parse::<Mood>().is_err());
    }

    #[test]
    fn test_mood_selects_collection_and_voice() {
        assert_eq!(Mood::Good.collection_name(), "emotion_good");
        assert_eq!(Mood::Bad.collection_name(), "emotion_bad");
        assert_ne!(Mood::Good.voice_name(), Mood::Bad.voice_name());
    }
}
