//! # Page Breaks
//!
//! The vertical cursor and the decision of when content has to move to a new
//! page. Every component asks the [`Paginator`] before it draws; none of them
//! compares against the bottom margin on its own.
//!
//! Opening a page always runs the [`PageDecorator`] first, so the sidebar is
//! on every page exactly once and underneath the content.

use super::{LayoutElement, LayoutPage, PageGeometry};

/// Draws the fixed chrome of a page. Called once per page, on an empty page,
/// before any content.
pub trait PageDecorator {
    fn decorate(&self, page: &mut LayoutPage);
}

/// Where the next piece of content goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    /// 1-based.
    pub page_number: usize,
    /// Baseline of the next line, in points from the bottom of the page.
    pub y: f64,
}

pub struct Paginator<'a> {
    geometry: PageGeometry,
    decorator: &'a dyn PageDecorator,
    cursor: Cursor,
    page: LayoutPage,
    pages: Vec<LayoutPage>,
}

impl<'a> Paginator<'a> {
    /// Open page 1, decorated, with the cursor at the top margin.
    pub fn new(geometry: PageGeometry, decorator: &'a dyn PageDecorator) -> Self {
        let page = Self::open_page(1, &geometry, decorator);
        Self {
            geometry,
            decorator,
            cursor: Cursor {
                page_number: 1,
                y: geometry.top_margin,
            },
            page,
            pages: Vec::new(),
        }
    }

    fn open_page(number: usize, geometry: &PageGeometry, decorator: &dyn PageDecorator) -> LayoutPage {
        let mut page = LayoutPage::new(number, geometry);
        decorator.decorate(&mut page);
        page
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn y(&self) -> f64 {
        self.cursor.y
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Move the cursor down without drawing.
    pub fn advance(&mut self, by: f64) {
        self.cursor.y -= by;
    }

    /// Would consuming `height` more put the cursor below the bottom margin?
    pub fn will_overflow(&self, height: f64) -> bool {
        self.cursor.y - height < self.geometry.bottom_margin
    }

    fn at_page_top(&self) -> bool {
        self.cursor.y >= self.geometry.top_margin
    }

    /// Close the current page and continue at the top of a fresh one.
    pub fn break_page(&mut self) {
        let number = self.cursor.page_number + 1;
        log::trace!(
            "page break at y={:.2}, opening page {}",
            self.cursor.y,
            number
        );
        let next = Self::open_page(number, &self.geometry, self.decorator);
        self.pages.push(std::mem::replace(&mut self.page, next));
        self.cursor = Cursor {
            page_number: number,
            y: self.geometry.top_margin,
        };
    }

    /// Break first if the next `height` points would not fit. A block taller
    /// than a whole page is placed on the current page when it is still
    /// empty, so this never produces a blank page.
    pub fn reserve(&mut self, height: f64) {
        if self.will_overflow(height) && !self.at_page_top() {
            self.break_page();
        }
    }

    /// Step down one line and return the baseline to draw it at. If the
    /// stepped-down baseline would fall below the bottom margin the line goes
    /// to the top of a new page instead.
    pub fn next_line(&mut self, line_height: f64) -> f64 {
        if self.will_overflow(line_height) {
            self.break_page();
        } else {
            self.advance(line_height);
        }
        self.cursor.y
    }

    /// Add an element to the current page.
    pub fn draw(&mut self, element: LayoutElement) {
        self.page.push(element);
    }

    /// Close the last page and return all pages in order.
    pub fn finish(mut self) -> Vec<LayoutPage> {
        self.pages.push(self.page);
        self.pages
    }
}
