//! Shortest edit script between two line sequences, per Myers'
//! "An O(ND) Difference Algorithm and Its Variations" (1986).
//!
//! Lines are interned to integer ids up front, so the inner search
//! compares ids only; matching head and tail runs are peeled off before
//! the search, which in practice leaves a small middle section.

use std::collections::HashMap;

/// A single step of the edit script relating `old` to `new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub op: EditOp,
    pub old_index: usize,
    pub new_index: usize,
}

/// The kind of step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Equal,
    Insert,
    Delete,
}

/// Diff two line sequences into an edit script ordered front to back.
pub fn diff(old: &[&[u8]], new: &[&[u8]]) -> Vec<Edit> {
    let (a, b) = intern(old, new);

    // Peel matching head and tail; only the middle needs the search.
    let mut head = 0;
    while head < a.len() && head < b.len() && a[head] == b[head] {
        head += 1;
    }
    let mut tail = 0;
    while tail < a.len() - head
        && tail < b.len() - head
        && a[a.len() - 1 - tail] == b[b.len() - 1 - tail]
    {
        tail += 1;
    }

    let mut script = Vec::with_capacity(a.len() + b.len());
    for i in 0..head {
        script.push(Edit {
            op: EditOp::Equal,
            old_index: i,
            new_index: i,
        });
    }

    shortest_edit(
        &a[head..a.len() - tail],
        &b[head..b.len() - tail],
        head,
        head,
        &mut script,
    );

    for i in 0..tail {
        script.push(Edit {
            op: EditOp::Equal,
            old_index: a.len() - tail + i,
            new_index: b.len() - tail + i,
        });
    }

    script
}

/// Map every distinct line to a small integer id; equality on ids is
/// equality on lines, so the search never re-compares bytes.
fn intern(old: &[&[u8]], new: &[&[u8]]) -> (Vec<u32>, Vec<u32>) {
    let mut table: HashMap<&[u8], u32> = HashMap::new();
    let mut a = Vec::with_capacity(old.len());
    let mut b = Vec::with_capacity(new.len());
    for &line in old {
        let next = table.len() as u32;
        a.push(*table.entry(line).or_insert(next));
    }
    for &line in new {
        let next = table.len() as u32;
        b.push(*table.entry(line).or_insert(next));
    }
    (a, b)
}

/// Run the greedy D-path search over the middle section and append the
/// resulting edits (with `a_off`/`b_off` added back) to `out`.
fn shortest_edit(a: &[u32], b: &[u32], a_off: usize, b_off: usize, out: &mut Vec<Edit>) {
    let n = a.len();
    let m = b.len();

    // One side empty: the script is all inserts or all deletes.
    if n == 0 {
        out.extend((0..m).map(|j| Edit {
            op: EditOp::Insert,
            old_index: a_off,
            new_index: b_off + j,
        }));
        return;
    }
    if m == 0 {
        out.extend((0..n).map(|i| Edit {
            op: EditOp::Delete,
            old_index: a_off + i,
            new_index: b_off,
        }));
        return;
    }

    let bound = n + m;
    let at = |k: isize| (k + bound as isize) as usize;

    // frontier[at(k)] is the furthest x reached on diagonal k so far. The
    // in-place update is sound because depth d only reads diagonals of the
    // opposite parity, which still hold depth d-1 values. One snapshot per
    // depth is kept so the chosen path can be replayed backwards.
    let mut frontier = vec![0usize; 2 * bound + 1];
    let mut snapshots: Vec<Vec<usize>> = Vec::new();
    let mut distance = 0isize;

    'search: for d in 0..=(bound as isize) {
        let mut k = -d;
        while k <= d {
            let step_down =
                k == -d || (k != d && frontier[at(k - 1)] < frontier[at(k + 1)]);
            let mut x = if step_down {
                frontier[at(k + 1)]
            } else {
                frontier[at(k - 1)] + 1
            };
            let mut y = (x as isize - k) as usize;

            while x < n && y < m && a[x] == b[y] {
                x += 1;
                y += 1;
            }
            frontier[at(k)] = x;

            if x >= n && y >= m {
                snapshots.push(frontier.clone());
                distance = d;
                break 'search;
            }
            k += 2;
        }
        snapshots.push(frontier.clone());
    }

    replay(&snapshots, distance, n, m, a_off, b_off, out);
}

/// Walk the recorded search backwards from `(n, m)` to `(0, 0)`,
/// re-deriving at each depth which diagonal the path came from, and emit
/// the edits front to back.
fn replay(
    snapshots: &[Vec<usize>],
    distance: isize,
    n: usize,
    m: usize,
    a_off: usize,
    b_off: usize,
    out: &mut Vec<Edit>,
) {
    let bound = n + m;
    let at = |k: isize| (k + bound as isize) as usize;

    let mut backwards = Vec::new();
    let mut x = n;
    let mut y = m;

    for d in (0..=distance).rev() {
        if d == 0 {
            // Only the opening snake remains; here x == y.
            while x > 0 {
                x -= 1;
                y -= 1;
                backwards.push(Edit {
                    op: EditOp::Equal,
                    old_index: x,
                    new_index: y,
                });
            }
            break;
        }

        let k = x as isize - y as isize;
        let before = &snapshots[(d - 1) as usize];
        let step_down = k == -d || (k != d && before[at(k - 1)] < before[at(k + 1)]);
        let from_k = if step_down { k + 1 } else { k - 1 };
        let from_x = before[at(from_k)];

        // Retrace the snake back to where this depth's single edit landed.
        let snake_start = if step_down { from_x } else { from_x + 1 };
        while x > snake_start {
            x -= 1;
            y -= 1;
            backwards.push(Edit {
                op: EditOp::Equal,
                old_index: x,
                new_index: y,
            });
        }

        // The edit itself: down consumed a new line, right an old one.
        if step_down {
            y -= 1;
            backwards.push(Edit {
                op: EditOp::Insert,
                old_index: x,
                new_index: y,
            });
        } else {
            x -= 1;
            backwards.push(Edit {
                op: EditOp::Delete,
                old_index: x,
                new_index: y,
            });
        }
    }

    out.extend(backwards.into_iter().rev().map(|e| Edit {
        op: e.op,
        old_index: e.old_index + a_off,
        new_index: e.new_index + b_off,
    }));
}
