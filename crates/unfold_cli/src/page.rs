//! Landing page reveal layout
//!
//! Lays out the page's revealable blocks as document-space rects for a
//! given viewport, using the same breakpoints, paddings and gaps as the
//! page stylesheet. Heights are fixed estimates of the rendered copy;
//! the replay only needs each block's position to be plausible.

use serde::Serialize;
use unfold_core::{Rect, Size};
use unfold_motion::Direction;

use crate::content::{BRANDS, FEATURES, STATS};

pub const FOOTER_HEIGHT: f32 = 420.0;

const MAX_CONTENT_WIDTH: f32 = 1920.0;
const SM: f32 = 640.0;
const MD: f32 = 768.0;
const LG: f32 = 1024.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Hero,
    Brands,
    Features,
    Stats,
    Contact,
}

/// One revealable block
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Block {
    pub label: String,
    pub section: Section,
    pub rect: Rect,
    pub direction: Direction,
    pub delay_ms: u32,
    /// The block hosts an image layer with parallax
    pub parallax: bool,
}

/// Every revealable block of the page for one viewport
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageLayout {
    pub viewport: Size,
    pub document_height: f32,
    pub blocks: Vec<Block>,
}

impl PageLayout {
    pub fn block(&self, label: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.label == label)
    }

    pub fn parallax_blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.parallax)
    }
}

/// Vertical stacking cursor inside one column
struct Column {
    x: f32,
    width: f32,
    y: f32,
}

impl Column {
    fn new(x: f32, width: f32, y: f32) -> Self {
        Self { x, width, y }
    }

    fn place(&mut self, height: f32, gap_after: f32) -> Rect {
        let rect = Rect::new(self.x, self.y, self.width, height);
        self.y += height + gap_after;
        rect
    }
}

struct Builder {
    viewport: Size,
    blocks: Vec<Block>,
}

impl Builder {
    fn push(&mut self, section: Section, label: impl Into<String>, rect: Rect) -> &mut Block {
        self.blocks.push(Block {
            label: label.into(),
            section,
            rect,
            direction: Direction::Up,
            delay_ms: 0,
            parallax: false,
        });
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    fn wide(&self) -> bool {
        self.viewport.width >= LG
    }

    /// Left edge and width of the padded content box
    fn content_box(&self) -> (f32, f32) {
        let outer = self.viewport.width.min(MAX_CONTENT_WIDTH);
        let pad = if self.wide() { 64.0 } else { 24.0 };
        let x = (self.viewport.width - outer) / 2.0 + pad;
        (x, (outer - 2.0 * pad).max(0.0))
    }
}

/// The landing page
pub struct LandingPage;

impl LandingPage {
    pub fn layout(viewport: Size) -> PageLayout {
        let mut builder = Builder {
            viewport,
            blocks: Vec::new(),
        };

        let mut y = 0.0;
        y = hero(&mut builder, y);
        y = brands(&mut builder, y);
        y = features(&mut builder, y);
        y = stats(&mut builder, y);
        y = contact(&mut builder, y);

        PageLayout {
            viewport,
            document_height: (y + FOOTER_HEIGHT).max(viewport.height),
            blocks: builder.blocks,
        }
    }
}

fn hero(b: &mut Builder, top: f32) -> f32 {
    let (x, width) = b.content_box();
    let wide = b.wide();

    // badge, heading, copy, actions, social proof
    let heights = if wide {
        [40.0, 160.0, 100.0, 100.0, 72.0]
    } else {
        [40.0, 120.0, 120.0, 100.0, 72.0]
    };
    let gap = 32.0;
    let left_height = heights.iter().sum::<f32>() + gap * 4.0 + 16.0;

    let column_width = if wide { (width - 96.0) / 2.0 } else { width };
    let image_side = column_width.min(672.0);
    let image_height = if wide { image_side } else { image_side * 0.75 };

    let (left_top, image_top, section_height) = if wide {
        let content = left_height.max(image_height);
        let height = b.viewport.height.max(content);
        let center = top + height / 2.0;
        (center - left_height / 2.0, center - image_height / 2.0, height)
    } else {
        let content = 80.0 + 48.0 + left_height + 48.0 + 48.0 + image_height;
        let height = b.viewport.height.max(content);
        (top + 80.0 + 48.0, top + 80.0 + 48.0 + left_height + 48.0 + 48.0, height)
    };

    let mut column = Column::new(x, column_width, left_top);
    let steps = [
        ("hero.badge", Direction::Left, 100),
        ("hero.heading", Direction::Up, 200),
        ("hero.copy", Direction::Up, 300),
        ("hero.actions", Direction::Up, 400),
        ("hero.social-proof", Direction::Up, 500),
    ];
    for (i, (label, direction, delay_ms)) in steps.into_iter().enumerate() {
        let after = if i == 0 { gap + 16.0 } else { gap };
        let block = b.push(Section::Hero, label, column.place(heights[i], after));
        block.direction = direction;
        block.delay_ms = delay_ms;
    }

    let image_x = if wide {
        // Right-aligned in the second column
        x + width - image_side
    } else {
        x
    };
    let image = b.push(
        Section::Hero,
        "hero.image",
        Rect::new(image_x, image_top, image_side, image_height),
    );
    image.direction = Direction::Right;
    image.delay_ms = 300;
    image.parallax = true;

    top + section_height
}

fn brands(b: &mut Builder, top: f32) -> f32 {
    let (x, width) = b.content_box();
    let wide = b.wide();
    let padding = 80.0;

    let heading_height = if wide { 45.0 } else { 36.0 };
    let mut column = Column::new(x, width, top + padding);
    b.push(Section::Brands, "brands.heading", column.place(heading_height, 48.0));

    // Centered flex-wrap row
    let (item_width, item_height) = (200.0, 60.0);
    let gap = if wide { 96.0 } else { 48.0 };
    let per_row = (((width + gap) / (item_width + gap)).floor() as usize).max(1);
    let rows = BRANDS.chunks(per_row).count();

    for (row, names) in BRANDS.chunks(per_row).enumerate() {
        let row_width = names.len() as f32 * (item_width + gap) - gap;
        let row_x = x + (width - row_width) / 2.0;
        let row_y = column.y + row as f32 * (item_height + gap);
        for (i, name) in names.iter().enumerate() {
            let index = row * per_row + i;
            let item_x = row_x + i as f32 * (item_width + gap);
            let rect = Rect::new(item_x, row_y, item_width, item_height);
            let block = b.push(Section::Brands, format!("brands.{name}"), rect);
            block.delay_ms = index as u32 * 100;
        }
    }

    let rows_height = rows as f32 * (item_height + gap) - gap;
    column.y + rows_height + padding
}

fn features(b: &mut Builder, top: f32) -> f32 {
    let (x, width) = b.content_box();
    let wide = b.wide();
    let padding = 128.0;
    let header_top = top + padding;

    let header_bottom = if wide {
        let heading = Rect::new(x, header_top, width - 448.0 - 32.0, 150.0);
        // Paragraph aligned to the bottom of the row
        let copy = Rect::new(x + width - 448.0, header_top + 150.0 - 90.0, 448.0, 90.0);
        b.push(Section::Features, "features.heading", heading);
        b.push(Section::Features, "features.copy", copy).delay_ms = 200;
        header_top + 150.0
    } else {
        let mut column = Column::new(x, width, header_top);
        b.push(Section::Features, "features.heading", column.place(100.0, 32.0));
        let copy = column.place(112.0, 0.0);
        b.push(Section::Features, "features.copy", copy).delay_ms = 200;
        column.y
    };

    let cards_top = header_bottom + 80.0;
    let columns = if b.viewport.width >= MD { 3 } else { 1 };
    let gap = if wide { 48.0 } else { 32.0 };
    let card_width = (width - gap * (columns as f32 - 1.0)) / columns as f32;
    let card_height = 440.0;

    for (index, feature) in FEATURES.iter().enumerate() {
        let (col, row) = (index % columns, index / columns);
        let rect = Rect::new(
            x + col as f32 * (card_width + gap),
            cards_top + row as f32 * (card_height + gap),
            card_width,
            card_height,
        );
        let block = b.push(Section::Features, format!("features.{}", feature.id), rect);
        block.delay_ms = index as u32 * 150;
    }

    let rows = FEATURES.len().div_ceil(columns);
    cards_top + rows as f32 * (card_height + gap) - gap + padding
}

fn stats(b: &mut Builder, top: f32) -> f32 {
    let (x, width) = b.content_box();
    let wide = b.wide();
    let padding = 128.0;
    let story_height = 620.0;

    let (story, grid_x, grid_width, grid_top) = if wide {
        let column_width = (width - 96.0) / 2.0;
        let story = Rect::new(x, top + padding, column_width, story_height);
        (story, x + column_width + 96.0, column_width, top + padding)
    } else {
        let story = Rect::new(x, top + padding, width, story_height);
        (story, x, width, top + padding + story_height + 64.0)
    };
    b.push(Section::Stats, "stats.story", story);

    let columns = if b.viewport.width >= SM { 2 } else { 1 };
    let gap = 24.0;
    let card_width = (grid_width - gap * (columns as f32 - 1.0)) / columns as f32;
    let card_height = 280.0;

    for (index, stat) in STATS.iter().enumerate() {
        let (col, row) = (index % columns, index / columns);
        let rect = Rect::new(
            grid_x + col as f32 * (card_width + gap),
            grid_top + row as f32 * (card_height + gap),
            card_width,
            card_height,
        );
        let block = b.push(Section::Stats, format!("stats.{}", stat.value), rect);
        block.delay_ms = index as u32 * 100;
    }

    let rows = STATS.len().div_ceil(columns);
    // Spans the grid, one gap below the last row
    let visual_top = grid_top + rows as f32 * (card_height + gap);
    let visual = Rect::new(grid_x, visual_top, grid_width, 256.0);
    b.push(Section::Stats, "stats.visual", visual).delay_ms = 400;

    visual.bottom().max(story.bottom()) + padding
}

fn contact(b: &mut Builder, top: f32) -> f32 {
    let padding = 96.0;
    let outer = b.viewport.width.min(1024.0);
    let x = (b.viewport.width - outer) / 2.0 + 24.0;
    let rect = Rect::new(x, top + padding, (outer - 48.0).max(0.0), 330.0);
    b.push(Section::Contact, "contact.cta", rect);
    rect.bottom() + padding
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop() -> PageLayout {
        LandingPage::layout(Size::new(1440.0, 900.0))
    }

    fn phone() -> PageLayout {
        LandingPage::layout(Size::new(390.0, 844.0))
    }

    #[test]
    fn test_block_inventory() {
        let layout = desktop();
        let count = |section| layout.blocks.iter().filter(|b| b.section == section).count();

        assert_eq!(count(Section::Hero), 6);
        assert_eq!(count(Section::Brands), 1 + BRANDS.len());
        assert_eq!(count(Section::Features), 2 + FEATURES.len());
        assert_eq!(count(Section::Stats), 2 + STATS.len());
        assert_eq!(count(Section::Contact), 1);
        assert_eq!(layout.parallax_blocks().count(), 1);
    }

    #[test]
    fn test_hero_directions_and_delays() {
        let layout = desktop();
        let badge = layout.block("hero.badge").unwrap();
        assert_eq!((badge.direction, badge.delay_ms), (Direction::Left, 100));

        let image = layout.block("hero.image").unwrap();
        assert_eq!((image.direction, image.delay_ms), (Direction::Right, 300));
        assert!(image.parallax);
    }

    #[test]
    fn test_staggered_delays() {
        let layout = desktop();
        let delays = |prefix: &str| -> Vec<u32> {
            layout
                .blocks
                .iter()
                .filter(|b| b.label.starts_with(prefix))
                .map(|b| b.delay_ms)
                .collect()
        };

        assert_eq!(delays("brands.Brand"), vec![0, 100, 200]);
        assert_eq!(delays("features.feat-"), vec![0, 150, 300]);
        assert_eq!(delays("stats.visual"), vec![400]);
    }

    #[test]
    fn test_blocks_fit_in_document() {
        for layout in [desktop(), phone()] {
            assert!(layout.document_height > layout.viewport.height);
            for block in &layout.blocks {
                assert!(block.rect.y() >= 0.0, "{} starts above the page", block.label);
                assert!(
                    block.rect.bottom() <= layout.document_height,
                    "{} ends below the page",
                    block.label
                );
                assert!(block.rect.width() > 0.0 && block.rect.height() > 0.0);
            }
        }
    }

    #[test]
    fn test_sections_are_ordered() {
        let layout = phone();
        let top = |label| layout.block(label).unwrap().rect.y();

        assert!(top("hero.badge") < top("hero.image"));
        assert!(top("hero.image") < top("brands.heading"));
        assert!(top("brands.heading") < top("features.heading"));
        assert!(top("features.feat-3") < top("stats.story"));
        assert!(top("stats.visual") < top("contact.cta"));
    }

    #[test]
    fn test_phone_stacks_cards() {
        let layout = phone();
        let first = layout.block("features.feat-1").unwrap().rect;
        let second = layout.block("features.feat-2").unwrap().rect;

        assert_eq!(first.x(), second.x());
        assert!(second.y() > first.bottom());
    }
}
