// Fixed-capacity rolling window shared by the position, distance, label and
// timing histories

/// Array-backed ring buffer. Capacity is set at construction and never
/// changes; pushing into a full buffer evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    data: Vec<T>,
    capacity: usize,
    /// Slot holding the oldest entry once the buffer is full
    head: usize,
}

impl<T: Copy> RingBuffer<T> {
    /// Capacity is raised to 1 if given 0; callers validate window sizes first.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    /// Append a value, returning the evicted entry if the buffer was full
    pub fn push(&mut self, value: T) -> Option<T> {
        if self.data.len() < self.capacity {
            self.data.push(value);
            return None;
        }

        let evicted = std::mem::replace(&mut self.data[self.head], value);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn oldest(&self) -> Option<T> {
        self.get(0)
    }

    /// Entry `i` counting from the oldest
    pub fn get(&self, i: usize) -> Option<T> {
        if i >= self.data.len() {
            return None;
        }
        Some(self.data[(self.head + i) % self.data.len()])
    }

    /// Oldest-first iteration
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.data.len()).map(move |i| self.data[(self.head + i) % self.data.len()])
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.head = 0;
    }
}

macro_rules! impl_mean {
    ($($t:ty),*) => {$(
        impl RingBuffer<$t> {
            /// Arithmetic mean of the current window
            pub fn mean(&self) -> Option<$t> {
                if self.data.is_empty() {
                    return None;
                }
                Some(self.data.iter().sum::<$t>() / self.data.len() as $t)
            }
        }
    )*};
}

impl_mean!(f32, f64);
