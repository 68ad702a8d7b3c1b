#[derive(Debug, Clone, PartialEq)]
pub struct PackedBox {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Starting column index.
    pub column: usize,
    /// 1 normally, 2 for the expanded item when the layout has room.
    pub column_span: usize,
}

impl PackedBox {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Result of one pack cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct MasonryGrid {
    pub boxes: Vec<PackedBox>,
    pub container_width: f32,
    pub container_height: f32,
    pub column_width: f32,
    pub column_count: usize,
}

impl MasonryGrid {
    pub fn empty(container_width: f32, container_height: f32, column_count: usize) -> Self {
        Self {
            boxes: Vec::new(),
            container_width: container_width.max(0.0),
            container_height,
            column_width: 0.0,
            column_count,
        }
    }

    pub fn get(&self, id: &str) -> Option<&PackedBox> {
        self.boxes.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}
