//! Mô hình dữ liệu lõi cho timeline dạng thẻ và phép dẫn xuất trạng thái ban đầu.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cấu hình điều khiển chế độ hiển thị của timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineConfig {
    /// Bật chế độ slideshow (tự động lật thẻ theo chu kỳ).
    pub slide_show: bool,
    /// Chu kỳ lật thẻ tính bằng mili giây.
    pub slide_item_duration_ms: u64,
    /// Vị trí tiêu đề áp dụng chung cho mọi thẻ.
    pub title_position: TitlePosition,
    /// Chỉ số thẻ được kích hoạt lúc khởi tạo (mặc định là thẻ đầu).
    pub active_item_index: Option<usize>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            slide_show: false,
            slide_item_duration_ms: 2000,
            title_position: TitlePosition::Top,
            active_item_index: None,
        }
    }
}

/// Vị trí đặt tiêu đề của thẻ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TitlePosition {
    #[default]
    Top,
    Bottom,
}

impl TitlePosition {
    /// Dạng chữ thường dùng cho lớp hiển thị.
    pub fn as_str(&self) -> &'static str {
        match self {
            TitlePosition::Top => "top",
            TitlePosition::Bottom => "bottom",
        }
    }
}

/// Phân loại media đính kèm thẻ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

/// Tham chiếu media (ảnh hoặc video) của một thẻ.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaRef {
    pub kind: MediaKind,
    pub source: String,
    pub name: Option<String>,
}

/// Nội dung chi tiết của thẻ: một đoạn văn hoặc danh sách đoạn có thứ tự.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CardDetail {
    Text(String),
    Blocks(Vec<String>),
}

/// Một mục timeline do phía gọi cung cấp. Không đảm bảo có định danh sẵn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TimelineItem {
    /// Định danh ngoài (tương đương key của children), nếu phía gọi gán.
    #[serde(default)]
    pub key: Option<String>,
    pub title: String,
    #[serde(default)]
    pub card_title: Option<String>,
    #[serde(default)]
    pub card_subtitle: Option<String>,
    #[serde(default)]
    pub card_detail: Option<CardDetail>,
    #[serde(default)]
    pub media: Option<MediaRef>,
    #[serde(default)]
    pub url: Option<String>,
    /// Mốc thời gian dùng để sắp xếp theo trình tự.
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
    /// Các mục con lồng nhau.
    #[serde(default)]
    pub items: Vec<TimelineItem>,
}

/// Mục timeline kèm trạng thái trình bày do engine sở hữu.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DerivedTimelineItem {
    /// Định danh ổn định, sinh một lần và giữ nguyên qua các lần đối soát.
    pub id: String,
    pub position: TitlePosition,
    /// Thẻ đã được lộ ra hay chưa (chỉ có ý nghĩa trong slideshow).
    pub visible: bool,
    /// Thẻ đang được chọn/làm nổi bật.
    pub active: bool,
    pub item: TimelineItem,
}

/// Sinh token định danh mới cho một mục.
pub fn new_item_id() -> String {
    Uuid::new_v4().to_string()
}

/// Dẫn xuất trạng thái trình bày ban đầu từ danh sách thô.
///
/// Hàm thuần: cùng độ dài, cùng thứ tự với đầu vào. Danh sách rỗng cho ra
/// danh sách rỗng. Khi slideshow tắt, mọi thẻ hiển thị ngay; khi bật, chỉ thẻ
/// đang kích hoạt lộ ra và scheduler sẽ lộ dần phần còn lại.
pub fn derive_items(items: &[TimelineItem], config: &TimelineConfig) -> Vec<DerivedTimelineItem> {
    let active_index = config
        .active_item_index
        .filter(|&index| index < items.len())
        .unwrap_or(0);

    items
        .iter()
        .enumerate()
        .map(|(index, item)| DerivedTimelineItem {
            id: new_item_id(),
            position: config.title_position,
            visible: !config.slide_show || index == active_index,
            active: index == active_index,
            item: item.clone(),
        })
        .collect()
}

/// Sắp xếp ổn định theo `occurred_at`; mục thiếu mốc thời gian đứng trước.
pub fn sort_chronologically(items: &mut [TimelineItem]) {
    items.sort_by_key(|item| item.occurred_at);
}

/// Lỗi chung của lớp dữ liệu timeline.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
}

/// Đọc danh sách mục từ chuỗi JSON.
pub fn items_from_json(json: &str) -> Result<Vec<TimelineItem>, TimelineError> {
    serde_json::from_str(json).map_err(|err| TimelineError::Parse(err.to_string()))
}
