table! {
  user_ (id) {
    id -> Integer,
    name -> Text,
    email -> Nullable<Text>,
    karma -> BigInt,
    admin -> Bool,
    published -> Timestamp,
    updated -> Nullable<Timestamp>,
  }
}

table! {
  sub (id) {
    id -> Integer,
    title -> Text,
    description -> Text,
    published -> Timestamp,
    updated -> Nullable<Timestamp>,
  }
}

table! {
  sub_membership (id) {
    id -> Integer,
    sub_id -> Integer,
    user_id -> Integer,
    published -> Timestamp,
  }
}

table! {
  sub_moderator (id) {
    id -> Integer,
    sub_id -> Integer,
    user_id -> Integer,
    published -> Timestamp,
  }
}

table! {
  post (id) {
    id -> Integer,
    sub_id -> Integer,
    creator_id -> Nullable<Integer>,
    title -> Text,
    body -> Text,
    deleted -> Bool,
    upvotes -> BigInt,
    published -> Timestamp,
    updated -> Nullable<Timestamp>,
  }
}

table! {
  comment (id) {
    id -> Integer,
    post_id -> Integer,
    creator_id -> Nullable<Integer>,
    parent_id -> Nullable<Integer>,
    body -> Text,
    deleted -> Bool,
    upvotes -> BigInt,
    published -> Timestamp,
    updated -> Nullable<Timestamp>,
  }
}

table! {
  vote (id) {
    id -> Integer,
    user_id -> Integer,
    target_kind -> SmallInt,
    target_id -> Integer,
    score -> SmallInt,
    published -> Timestamp,
    updated -> Nullable<Timestamp>,
  }
}

joinable!(post -> sub (sub_id));
joinable!(comment -> post (post_id));
joinable!(sub_membership -> sub (sub_id));
joinable!(sub_membership -> user_ (user_id));
joinable!(sub_moderator -> sub (sub_id));
joinable!(sub_moderator -> user_ (user_id));
joinable!(vote -> user_ (user_id));

allow_tables_to_appear_in_same_query!(
  user_,
  sub,
  sub_membership,
  sub_moderator,
  post,
  comment,
  vote
);
