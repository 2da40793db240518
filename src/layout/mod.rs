//! Page layout: geometry options, pagination and page decoration.

mod decorate;
mod options;
mod paginate;

pub use decorate::{page_label, Decorator};
pub use options::{LayoutOptions, Margins, PageLayout};
pub use paginate::{
    column_boxes, split_rows, Align, ColumnBox, MeasuredCell, MeasuredRow, MeasuredTable,
    PagePlan, Paginator, Pagination, Placement,
};
