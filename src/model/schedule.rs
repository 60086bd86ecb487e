//! Schedule model: days made of task and routine time blocks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RecordId;

/// What a time block is reserved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Task,
    Routine,
}

/// A block of time within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Block type as stored; see [`TimeBlock::kind`]
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub block_type: Option<String>,

    /// Start time, e.g. "09:00"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TimeBlock {
    /// The block's type, if it names a known one.
    #[must_use]
    pub fn kind(&self) -> Option<BlockType> {
        match self.block_type.as_deref()? {
            "task" => Some(BlockType::Task),
            "routine" => Some(BlockType::Routine),
            _ => None,
        }
    }
}

/// One scheduled day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    /// Day identifier, e.g. "2025-01-01" or "monday"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<TimeBlock>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScheduleDay {
    /// Number of blocks of the given type.
    #[must_use]
    pub fn count_blocks(&self, block_type: BlockType) -> usize {
        self.blocks
            .iter()
            .flatten()
            .filter(|b| b.kind() == Some(block_type))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_tag() {
        let day: ScheduleDay = serde_json::from_str(
            r#"{"day":"2025-01-01","blocks":[
                {"type":"task","start":"09:00","end":"10:00"},
                {"type":"routine","start":"07:00","end":"07:30"},
                {"type":"task","start":"13:00","end":"14:00"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(day.count_blocks(BlockType::Task), 2);
        assert_eq!(day.count_blocks(BlockType::Routine), 1);
    }

    #[test]
    fn test_unknown_block_type_is_kept() {
        let block: TimeBlock = serde_json::from_str(r#"{"type":"break","start":"12:00"}"#).unwrap();
        assert_eq!(block.kind(), None);
        assert_eq!(block.block_type.as_deref(), Some("break"));
    }
}
