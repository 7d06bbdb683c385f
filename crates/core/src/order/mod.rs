mod dto;
mod error;
mod grouping;
mod search;
mod seed;
mod shaping;
mod types;

pub use dto::{
    DeliveryDetailDto, ItemDetailDto, MemberDetailDto, OrderDetailDto, OrderDto, OrderFlatDto,
    OrderItemDetailDto, OrderItemDto, OrderItemQueryDto, OrderQueryDto, SimpleOrderDto,
};
pub use error::OrderError;
pub use grouping::{group_by_root, group_flat_orders, items_by_order_id};
pub use search::{OrderSearch, MAX_SEARCH_RESULTS};
pub use seed::{demo_dataset, Dataset, DatasetBuilder};
pub use shaping::{order_to_detail, orders_to_detail, orders_to_dto, orders_to_simple};
pub use types::{
    Address, Delivery, DeliveryStatus, Item, Member, Order, OrderItem, OrderItemRecord,
    OrderRecord, OrderStatus,
};
