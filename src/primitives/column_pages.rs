//! ColumnPages - Fixed-size pages stacked as a column.
//!
//! Page `p` holds items `[p * k, min((p + 1) * k, n))`, preceded by a
//! previous-page button when `p > 0` and followed by a next-page button
//! when `p < max_page`. One button per row, starting at the menu's origin.

use crate::error::{Error, Result};
use crate::layout::{display_width, truncate_content};
use crate::primitives::button::{ButtonProps, ButtonRole};
use crate::primitives::element::Node;
use crate::primitives::paged_menu::{PageBuilder, PageContext, PagedMenu};
use crate::primitives::types::{ButtonStyles, MenuProps, StateStyle};
use crate::state::events::SubmitValue;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnPages {
    items_per_page: Option<usize>,
}

impl ColumnPages {
    /// `None` keeps every item on one page.
    pub fn new(items_per_page: Option<usize>) -> Result<Self> {
        if items_per_page == Some(0) {
            return Err(Error::invalid_option("items_per_page", "must be at least 1"));
        }
        Ok(Self { items_per_page })
    }

    pub fn items_per_page(&self) -> Option<usize> {
        self.items_per_page
    }
}

/// Widest padding pair across the button states.
fn padding_width(styles: &ButtonStyles) -> u16 {
    let width = |style: &StateStyle| {
        display_width(&style.left_padding, styles.padding_has_markup)
            .saturating_add(display_width(&style.right_padding, styles.padding_has_markup))
    };
    [&styles.blur, &styles.focus, &styles.disabled, &styles.submitted]
        .into_iter()
        .map(width)
        .max()
        .unwrap_or(0)
}

/// Width that fits every item and both nav contents.
fn fit_width<V>(props: &MenuProps<V>, padding: u16) -> u16 {
    let items = props.items.iter().map(|item| display_width(&item.content, false));
    let nav = [
        display_width(&props.previous_page_content, props.previous_page_content_has_markup),
        display_width(&props.next_page_content, props.next_page_content_has_markup),
    ];
    items.chain(nav).max().unwrap_or(0).saturating_add(padding)
}

impl PageBuilder for ColumnPages {
    fn max_page(&self, item_count: usize) -> usize {
        match self.items_per_page {
            Some(k) if item_count > 0 => item_count.div_ceil(k) - 1,
            _ => 0,
        }
    }

    fn init_page<V: Clone + 'static>(&self, ctx: &PageContext<'_, V>) -> Vec<ButtonProps> {
        let props = ctx.props;
        let padding = padding_width(ctx.styles);
        let width = props.width.unwrap_or_else(|| fit_width(props, padding));
        let content_width = width.saturating_sub(padding);

        let range = match self.items_per_page {
            Some(k) => {
                let start = (ctx.page * k).min(ctx.items.len());
                start..((ctx.page + 1) * k).min(ctx.items.len())
            }
            None => 0..ctx.items.len(),
        };

        let mut rows: Vec<(String, bool, SubmitValue, ButtonRole)> = Vec::new();
        if ctx.page > 0 {
            rows.push((
                props.previous_page_content.clone(),
                props.previous_page_content_has_markup,
                SubmitValue::default(),
                ButtonRole::PreviousPage,
            ));
        }
        for item in &ctx.items[range] {
            rows.push((item.content.clone(), false, SubmitValue::new(item.value.clone()), ButtonRole::Item));
        }
        if ctx.page < ctx.max_page {
            rows.push((
                props.next_page_content.clone(),
                props.next_page_content_has_markup,
                SubmitValue::default(),
                ButtonRole::NextPage,
            ));
        }

        rows.into_iter()
            .enumerate()
            .map(|(row, (content, has_markup, value, role))| {
                let (content, content_has_markup) =
                    truncate_content(&content, has_markup, content_width, &props.content_ellipsis);
                ButtonProps {
                    x: props.x,
                    y: props.y.saturating_add(row as u16),
                    width: Some(width),
                    content,
                    content_has_markup,
                    value,
                    role,
                    styles: ctx.styles.clone(),
                    ..Default::default()
                }
            })
            .collect()
    }
}

impl<V: Clone + 'static> PagedMenu<ColumnPages, V> {
    /// A menu paging `items_per_page` items at a time in a single column.
    pub fn column(parent: Node, props: MenuProps<V>, items_per_page: Option<usize>) -> Result<Self> {
        let builder = ColumnPages::new(items_per_page)?;
        Ok(PagedMenu::new(parent, props, builder))
    }
}
