/// Color of the link from a node's parent to the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

impl Color {
    fn flip(self) -> Self {
        match self {
            Self::Red => Self::Black,
            Self::Black => Self::Red,
        }
    }
}

pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) color: Color,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// New leaves always hang off a red link.
    pub(crate) fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            color: Color::Red,
            left: None,
            right: None,
        }
    }

    pub(crate) fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    pub(crate) fn left_left_is_red(&self) -> bool {
        self.left.as_ref().is_some_and(|l| is_red(&l.left))
    }

    pub(crate) fn right_left_is_red(&self) -> bool {
        self.right.as_ref().is_some_and(|r| is_red(&r.left))
    }
}

/// Empty links count as black.
pub(crate) fn is_red<K, V>(link: &Link<K, V>) -> bool {
    link.as_deref().is_some_and(Node::is_red)
}

/// Turns a red right link into a red left link.
///
/// The right child becomes the subtree root and inherits `h`'s color, `h`
/// hangs off it as a red left child and takes over the old right-left subtree.
pub(crate) fn rotate_left<K, V>(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let mut x = h.right.take().expect("rotate_left requires a right child");
    h.right = x.left.take();
    x.color = h.color;
    h.color = Color::Red;
    x.left = Some(h);
    x
}

/// Mirror of [`rotate_left`].
pub(crate) fn rotate_right<K, V>(mut h: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let mut x = h.left.take().expect("rotate_right requires a left child");
    h.left = x.right.take();
    x.color = h.color;
    h.color = Color::Red;
    x.right = Some(h);
    x
}

/// Inverts the color of `h` and of both its children.
///
/// Both children must exist and share a color: two reds when splitting a
/// temporary 4-node on insert, two blacks when borrowing a red on delete.
pub(crate) fn flip_colors<K, V>(h: &mut Node<K, V>) {
    h.color = h.color.flip();
    let left = h.left.as_deref_mut().expect("flip_colors requires a left child");
    left.color = left.color.flip();
    let left_color = left.color;
    let right = h.right.as_deref_mut().expect("flip_colors requires a right child");
    right.color = right.color.flip();
    debug_assert_eq!(left_color, right.color, "flip_colors on mismatched children");
}
