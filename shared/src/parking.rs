//! 车位布局与分配
//!
//! 纯数据逻辑：车位状态着色、占用统计，以及给订阅挑选车位时的候选与校验。

use crate::models::ParkingSpace;

/// 布局图每行的车位数
pub const LOT_COLUMNS: usize = 5;

/// 车位在布局图上的状态，占用优先于已分配
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceState {
    Available,
    Allocated,
    Occupied,
}

impl SpaceState {
    pub const ALL: [SpaceState; 3] = [
        SpaceState::Available,
        SpaceState::Allocated,
        SpaceState::Occupied,
    ];

    pub fn of(space: &ParkingSpace) -> Self {
        if space.is_occupied {
            SpaceState::Occupied
        } else if space.is_allocated {
            SpaceState::Allocated
        } else {
            SpaceState::Available
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpaceState::Available => "Available",
            SpaceState::Allocated => "Allocated",
            SpaceState::Occupied => "Occupied",
        }
    }
}

/// 各状态的车位数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LotOccupancy {
    pub available: usize,
    pub allocated: usize,
    pub occupied: usize,
}

impl LotOccupancy {
    pub fn count(spaces: &[ParkingSpace]) -> Self {
        spaces.iter().fold(Self::default(), |mut acc, space| {
            match SpaceState::of(space) {
                SpaceState::Available => acc.available += 1,
                SpaceState::Allocated => acc.allocated += 1,
                SpaceState::Occupied => acc.occupied += 1,
            }
            acc
        })
    }

    pub fn get(&self, state: SpaceState) -> usize {
        match state {
            SpaceState::Available => self.available,
            SpaceState::Allocated => self.allocated,
            SpaceState::Occupied => self.occupied,
        }
    }

    pub fn total(&self) -> usize {
        self.available + self.allocated + self.occupied
    }
}

/// 按 [`LOT_COLUMNS`] 切成行，保持服务端顺序
pub fn lot_rows(spaces: &[ParkingSpace]) -> Vec<Vec<ParkingSpace>> {
    spaces.chunks(LOT_COLUMNS).map(<[ParkingSpace]>::to_vec).collect()
}

// =========================================================
// 订阅车位分配
// =========================================================

/// 给一个订阅挑选车位：每个名额一个下拉框，已在别处选中的车位不再出现
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpaceAssignment {
    slots: Vec<Option<i64>>,
}

impl SpaceAssignment {
    pub fn new(spaces_allocated: u32) -> Self {
        Self {
            slots: vec![None; spaces_allocated as usize],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn selected(&self, slot: usize) -> Option<i64> {
        self.slots.get(slot).copied().flatten()
    }

    /// 设置某个名额的选择，`None` 表示清空；越界时忽略
    pub fn select(&mut self, slot: usize, space_id: Option<i64>) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = space_id;
        }
    }

    /// 第 `slot` 个下拉框可选的车位：未分配，且没有被其他名额选中
    pub fn candidates<'a>(&self, slot: usize, spaces: &'a [ParkingSpace]) -> Vec<&'a ParkingSpace> {
        let own = self.selected(slot);
        spaces
            .iter()
            .filter(|s| !s.is_allocated)
            .filter(|s| own == Some(s.id) || !self.slots.contains(&Some(s.id)))
            .collect()
    }

    /// 所有名额都已选择且互不重复时返回车位 id
    pub fn validate(&self) -> Result<Vec<i64>, String> {
        if self.slots.is_empty() {
            return Err("This subscription has no parking spaces to assign".to_string());
        }
        let mut ids = Vec::with_capacity(self.slots.len());
        for (idx, slot) in self.slots.iter().enumerate() {
            let id = slot.ok_or_else(|| format!("Select a parking space for #{}", idx + 1))?;
            if ids.contains(&id) {
                return Err("Each parking space can only be assigned once".to_string());
            }
            ids.push(id);
        }
        Ok(ids)
    }
}
