//! 分页与排序
//!
//! 列表接口的分页参数 (`page`, `size`, `sort`) 与分页响应。

use crate::error::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 默认每页数量
pub const DEFAULT_PAGE_SIZE: u32 = 20;
/// 每页数量上限
pub const MAX_PAGE_SIZE: u32 = 100;

/// 可排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Name,
    Brand,
    StarPoint,
    Abv,
    Volume,
    Id,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::CreatedAt,
        SortField::UpdatedAt,
        SortField::Name,
        SortField::Brand,
        SortField::StarPoint,
        SortField::Abv,
        SortField::Volume,
        SortField::Id,
    ];

    /// 对外字段名 (camelCase)
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
            SortField::Name => "name",
            SortField::Brand => "brand",
            SortField::StarPoint => "starPoint",
            SortField::Abv => "abv",
            SortField::Volume => "volume",
            SortField::Id => "id",
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::InvalidSort, format!("Unknown sort field: {s}"))
                    .with_detail("sort", s)
            })
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(AppError::with_message(
                ErrorCode::InvalidSort,
                format!("Unknown sort direction: {s}"),
            )
            .with_detail("sort", s)),
        }
    }
}

/// 排序规则
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for Sort {
    /// 默认按创建时间倒序
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Desc,
        }
    }
}

impl FromStr for Sort {
    type Err = AppError;

    /// `field` 或 `field,asc|desc`，省略方向时为升序
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(',') {
            Some((field, dir)) => (field.trim(), dir.trim().parse()?),
            None => (s.trim(), SortDirection::Asc),
        };
        Ok(Self {
            field: field.parse()?,
            direction,
        })
    }
}

/// 分页请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 页码 (从 0 开始)
    pub page: u32,
    /// 每页数量
    pub size: u32,
    pub sort: Sort,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Sort::default(),
        }
    }
}

impl PageRequest {
    /// 从查询字符串原始值解析，空白值视为缺省
    pub fn parse(page: Option<&str>, size: Option<&str>, sort: Option<&str>) -> AppResult<Self> {
        let mut req = Self::default();

        if let Some(raw) = non_blank(page) {
            req.page = raw.parse().map_err(|_| {
                AppError::with_message(
                    ErrorCode::ValueOutOfRange,
                    format!("page must be a non-negative integer, got {raw}"),
                )
                .with_detail("field", "page")
            })?;
        }

        if let Some(raw) = non_blank(size) {
            let size: u32 = raw.parse().unwrap_or(0);
            if !(1..=MAX_PAGE_SIZE).contains(&size) {
                return Err(AppError::with_message(
                    ErrorCode::ValueOutOfRange,
                    format!("size must be between 1 and {MAX_PAGE_SIZE}, got {raw}"),
                )
                .with_detail("field", "size"));
            }
            req.size = size;
        }

        if let Some(raw) = non_blank(sort) {
            req.sort = raw.parse()?;
        }

        Ok(req)
    }

    /// SQL OFFSET
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 分页响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// 数据列表
    pub data: Vec<T>,
    /// 总记录数
    pub total: u64,
    /// 当前页码
    pub page: u32,
    /// 每页数量
    pub limit: u32,
    /// 总页数
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit > 0 {
            total.div_ceil(u64::from(limit)) as u32
        } else {
            1
        };

        Self {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }

    /// 转换数据项，保留分页信息
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}
