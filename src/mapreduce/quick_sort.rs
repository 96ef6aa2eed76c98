/*! External quick sort with a caller-supplied comparator (spec.md §4.1
`create_quick_sorted_block` / `merge_quick_sorted_blocks`). Used where a
radix sort's fixed key width doesn't fit — e.g. sorting `HitItem`s by the
composite `(word_id, doc_id, enc)` order.

Iterative partition with a median-of-three pivot, matching the source's
own description of its sort ("iterative partition with a median-of-three
pivot", spec.md §4.1 "External sort detail").
!*/
use std::cmp::Ordering;

/// Sorts `items` in place using an explicit stack instead of recursion
/// (avoids blowing the stack on an adversarial already-sorted input, the
/// classic quicksort worst case).
pub fn quick_sort_by<T, F>(items: &mut [T], cmp: F)
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() < 2 {
        return;
    }
    let mut stack = vec![(0usize, items.len() - 1)];
    while let Some((lo, hi)) = stack.pop() {
        if lo >= hi {
            continue;
        }
        let p = partition(items, lo, hi, &cmp);
        if p > lo {
            stack.push((lo, p - 1));
        }
        stack.push((p + 1, hi));
    }
}

fn median_of_three<T, F>(items: &[T], lo: usize, mid: usize, hi: usize, cmp: &F) -> usize
where
    F: Fn(&T, &T) -> Ordering,
{
    let (a, b, c) = (&items[lo], &items[mid], &items[hi]);
    if cmp(a, b) == Ordering::Less {
        if cmp(b, c) == Ordering::Less {
            mid
        } else if cmp(a, c) == Ordering::Less {
            hi
        } else {
            lo
        }
    } else if cmp(a, c) == Ordering::Less {
        lo
    } else if cmp(b, c) == Ordering::Less {
        hi
    } else {
        mid
    }
}

fn partition<T, F>(items: &mut [T], lo: usize, hi: usize, cmp: &F) -> usize
where
    F: Fn(&T, &T) -> Ordering,
{
    let mid = lo + (hi - lo) / 2;
    let pivot_idx = median_of_three(items, lo, mid, hi, cmp);
    items.swap(pivot_idx, hi);

    let mut store = lo;
    for i in lo..hi {
        if cmp(&items[i], &items[hi]) == Ordering::Less {
            items.swap(i, store);
            store += 1;
        }
    }
    items.swap(store, hi);
    store
}

/// Merges `runs`, each already sorted by `cmp`, in windows of
/// `merge_pass_window` (spec.md §4.1 default 64), discarding each pass's
/// input runs once the merged output is produced.
pub fn merge_quick_sorted_runs<T, F>(
    mut runs: Vec<Vec<T>>,
    cmp: F,
    merge_pass_window: usize,
) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    let window = merge_pass_window.max(2);
    while runs.len() > 1 {
        let mut next_pass = Vec::with_capacity(runs.len() / window + 1);
        for chunk in runs.chunks_mut(window) {
            let owned: Vec<Vec<T>> = chunk.iter_mut().map(std::mem::take).collect();
            next_pass.push(k_way_merge(owned, &cmp));
        }
        runs = next_pass;
    }
    runs.pop().unwrap_or_default()
}

fn k_way_merge<T, F>(runs: Vec<Vec<T>>, cmp: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut cursors: Vec<std::iter::Peekable<std::vec::IntoIter<T>>> =
        runs.into_iter().map(|r| r.into_iter().peekable()).collect();
    let total: usize = cursors.iter().map(|c| c.len()).sum();
    let mut out = Vec::with_capacity(total);
    loop {
        let mut best: Option<usize> = None;
        for (idx, cursor) in cursors.iter_mut().enumerate() {
            if let Some(v) = cursor.peek() {
                match best {
                    None => best = Some(idx),
                    Some(b) => {
                        if cmp(v, cursors[b].peek().unwrap()) == Ordering::Less {
                            best = Some(idx);
                        }
                    }
                }
            }
        }
        match best {
            Some(idx) => out.push(cursors[idx].next().unwrap()),
            None => break,
        }
    }
    out
}
