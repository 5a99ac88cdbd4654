//! Планирование вертикальных объединений идентифицирующих ячеек групп.

use crate::types::MergeRange;

/// Накопитель диапазонов объединения, заполняется по мере вывода строк.
#[derive(Debug, Clone, Default)]
pub struct MergePlanner {
    columns: Vec<u16>,
    ranges: Vec<MergeRange>,
}

impl MergePlanner {
    /// Планировщик для заданных столбцов.
    #[inline]
    pub const fn new(columns: Vec<u16>) -> Self {
        Self {
            columns,
            ranges: Vec::new(),
        }
    }

    /// Регистрирует группу из `data_rows` строк, начиная с `first_row`.
    ///
    /// Группа без строк не даёт диапазонов; группа из одной строки даёт
    /// вырожденные диапазоны с `first_row == last_row`.
    pub fn record_group(&mut self, first_row: usize, data_rows: usize) {
        if data_rows == 0 {
            return;
        }
        let last_row = first_row + data_rows - 1;
        self.ranges
            .extend(self.columns.iter().map(|&column| MergeRange {
                column,
                first_row,
                last_row,
            }));
    }

    /// Готовые диапазоны в порядке регистрации.
    #[inline]
    pub fn finish(self) -> Vec<MergeRange> {
        self.ranges
    }
}
